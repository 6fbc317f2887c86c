//! Login gate.
//!
//! A submission never settles before the configured floor has elapsed, and
//! every failure collapses into the same message.
use std::{future::Future, time::Duration};

use api_types::auth::LoginResponse;

use crate::{client::ClientError, local_state::Session};

pub const GENERIC_REJECTION: &str = "Credenciais incorretas ou servidor indisponível.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    Authenticated(Session),
    Rejected(String),
}

#[derive(Debug)]
pub struct LoginGate {
    state: LoginState,
    floor: Duration,
}

impl LoginGate {
    pub fn new(floor: Duration) -> Self {
        Self {
            state: LoginState::Idle,
            floor,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == LoginState::Submitting
    }

    /// Runs `request` alongside the floor timer and settles the gate.
    ///
    /// A second submission while one is in flight is ignored.
    pub async fn submit<F>(&mut self, email: &str, request: F) -> &LoginState
    where
        F: Future<Output = Result<LoginResponse, ClientError>>,
    {
        if self.is_submitting() {
            return &self.state;
        }
        self.state = LoginState::Submitting;

        let (result, ()) = tokio::join!(request, tokio::time::sleep(self.floor));
        self.state = match result {
            Ok(response) => {
                tracing::info!(user = %email, "login accepted");
                LoginState::Authenticated(Session::new(email, response))
            }
            Err(err) => {
                tracing::warn!(user = %email, error = %err, "login rejected");
                LoginState::Rejected(GENERIC_REJECTION.to_string())
            }
        };
        &self.state
    }

    /// Clears a rejection so the form can be retried.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, LoginState::Rejected(_)) {
            self.state = LoginState::Idle;
        }
    }
}
