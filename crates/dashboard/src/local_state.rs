use std::{fs, path::Path};

use api_types::auth::LoginResponse;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Client-side state persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub session: Option<Session>,
}

/// An authenticated session. Only the Gateway-issued token is kept; the
/// password never touches disk.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub display_name: String,
    pub email: String,
}

impl Session {
    pub fn new(email: &str, response: LoginResponse) -> Self {
        Self {
            token: response.token,
            display_name: response.name,
            email: email.to_string(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .finish()
    }
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Returns whether a session was present.
    pub fn sign_out(&mut self) -> bool {
        self.session.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("financecore-{}-{name}", std::process::id()))
            .join("state.json")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn missing_file_is_an_empty_state() {
        let state = LocalState::load(&temp_path("missing")).unwrap();
        assert!(state.session.is_none());
    }

    #[test]
    fn session_survives_a_save_and_is_cleared_on_sign_out() {
        let path = temp_path("roundtrip");
        let mut state = LocalState::default();
        state.sign_in(Session::new(
            "ana@casa.com",
            LoginResponse {
                token: "tok-1".to_string(),
                name: "Ana".to_string(),
            },
        ));
        state.save(&path).unwrap();

        let mut loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded.session, state.session);
        assert!(loaded.sign_out());
        assert!(!loaded.sign_out());
        loaded.save(&path).unwrap();
        assert!(LocalState::load(&path).unwrap().session.is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let session = Session {
            token: "secret-token".to_string(),
            display_name: "Ana".to_string(),
            email: "ana@casa.com".to_string(),
        };
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}
