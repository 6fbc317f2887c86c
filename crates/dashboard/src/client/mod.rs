use std::time::Duration;

use api_types::{
    ErrorResponse,
    auth::{LoginRequest, LoginResponse},
    category::{CategoryNew, CategoryView},
    person::{PersonView, PersonWrite},
    totals::TotalsResponse,
    transaction::{TransactionNew, TransactionView},
    user::{UserView, UserWrite},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server: {0}")]
    Server(String),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// REST client for the finance Gateway.
///
/// Every call except [`Client::login`] carries the session token as a
/// bearer credential once one is attached with [`Client::with_token`].
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::InvalidConfig(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint {path}: {err}")))?;
        tracing::debug!(%method, %endpoint, "gateway request");
        let builder = self.http.request(method, endpoint);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let res = self
            .request(Method::GET, path)?
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let res = check(res).await?;
        res.json::<T>().await.map_err(ClientError::Transport)
    }

    /// Sends a write; the response body, if any, is ignored.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<()> {
        let mut builder = self.request(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let res = builder.send().await.map_err(ClientError::Transport)?;
        check(res).await?;
        Ok(())
    }

    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<LoginResponse> {
        let res = self
            .request(Method::POST, "Auth/Login")?
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let res = check(res).await?;
        res.json::<LoginResponse>()
            .await
            .map_err(ClientError::Transport)
    }

    pub async fn people(&self) -> ClientResult<Vec<PersonView>> {
        self.fetch("Pessoas").await
    }

    pub async fn person_create(&self, payload: &PersonWrite) -> ClientResult<()> {
        self.submit(Method::POST, "Pessoas", Some(payload)).await
    }

    pub async fn person_update(&self, id: i64, payload: &PersonWrite) -> ClientResult<()> {
        self.submit(Method::PUT, &format!("Pessoas/{id}"), Some(payload))
            .await
    }

    pub async fn person_delete(&self, id: i64) -> ClientResult<()> {
        self.submit::<()>(Method::DELETE, &format!("Pessoas/{id}"), None)
            .await
    }

    pub async fn categories(&self) -> ClientResult<Vec<CategoryView>> {
        self.fetch("Categorias").await
    }

    pub async fn category_create(&self, payload: &CategoryNew) -> ClientResult<()> {
        self.submit(Method::POST, "Categorias", Some(payload)).await
    }

    pub async fn transactions(&self) -> ClientResult<Vec<TransactionView>> {
        self.fetch("Transacoes").await
    }

    pub async fn transaction_create(&self, payload: &TransactionNew) -> ClientResult<()> {
        self.submit(Method::POST, "Transacoes", Some(payload)).await
    }

    pub async fn users(&self) -> ClientResult<Vec<UserView>> {
        self.fetch("Usuarios").await
    }

    pub async fn user_create(&self, payload: &UserWrite) -> ClientResult<()> {
        self.submit(Method::POST, "Usuarios", Some(payload)).await
    }

    pub async fn user_update(&self, id: i64, payload: &UserWrite) -> ClientResult<()> {
        self.submit(Method::PUT, &format!("Usuarios/{id}"), Some(payload))
            .await
    }

    pub async fn user_delete(&self, id: i64) -> ClientResult<()> {
        self.submit::<()>(Method::DELETE, &format!("Usuarios/{id}"), None)
            .await
    }

    pub async fn totals(&self) -> ClientResult<TotalsResponse> {
        self.fetch("Totais/Pessoas").await
    }
}

async fn check(res: Response) -> ClientResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::debug!(status = status.as_u16(), error = %body, "gateway rejected request");

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let client = Client::new(
            "https://gateway.example/api",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://gateway.example/api/");
        assert_eq!(
            client.base_url().join("Pessoas/3").unwrap().as_str(),
            "https://gateway.example/api/Pessoas/3"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            Client::new("not a url", Duration::from_secs(5)),
            Err(AppError::InvalidConfig(_))
        ));
    }
}
