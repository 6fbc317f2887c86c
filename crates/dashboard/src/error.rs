use engine::EngineError;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("gateway error: {0}")]
    Gateway(#[from] ClientError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("no stored session")]
    NotLoggedIn,
    #[error("login rejected")]
    LoginRejected,
}

/// The three failure families surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Validation,
    Auth,
    Local,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Gateway(ClientError::Unauthorized | ClientError::Forbidden)
            | Self::NotLoggedIn
            | Self::LoginRejected => FailureKind::Auth,
            Self::Gateway(ClientError::Validation(_)) => FailureKind::Validation,
            Self::Gateway(_) | Self::Http(_) => FailureKind::Network,
            Self::Engine(err) if err.is_validation() => FailureKind::Validation,
            _ => FailureKind::Local,
        }
    }

    /// Message shown to the user; technical detail stays in the log.
    pub fn notification(&self) -> String {
        match self {
            Self::NotLoggedIn => "Sessão não encontrada. Entre com `financecore login`.".to_string(),
            Self::LoginRejected => crate::login::GENERIC_REJECTION.to_string(),
            Self::Gateway(ClientError::Unauthorized | ClientError::Forbidden) => {
                "Acesso negado. Entre novamente com `financecore login`.".to_string()
            }
            Self::Gateway(ClientError::NotFound) => "Registro não encontrado.".to_string(),
            Self::Gateway(ClientError::Conflict(message)) => format!("Conflito: {message}"),
            Self::Gateway(ClientError::Validation(message)) => {
                format!("Dados recusados pelo servidor: {message}")
            }
            Self::Gateway(ClientError::Server(message)) => format!("Erro no servidor: {message}"),
            Self::Gateway(ClientError::Transport(_)) | Self::Http(_) => {
                "Servidor indisponível. Tente novamente mais tarde.".to_string()
            }
            Self::Engine(err) if err.is_validation() => format!("Dados inválidos: {err}"),
            Self::Engine(err) => format!("Falha na exportação: {err}"),
            Self::Config(err) => format!("Configuração inválida: {err}"),
            Self::InvalidConfig(message) => format!("Configuração inválida: {message}"),
            Self::Io(err) => format!("Erro de arquivo: {err}"),
            Self::Json(err) => format!("Arquivo de sessão corrompido: {err}"),
            Self::Terminal(message) => format!("Erro de terminal: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_their_family() {
        assert_eq!(AppError::NotLoggedIn.kind(), FailureKind::Auth);
        assert_eq!(
            AppError::Gateway(ClientError::Unauthorized).kind(),
            FailureKind::Auth
        );
        assert_eq!(
            AppError::Gateway(ClientError::Server("boom".to_string())).kind(),
            FailureKind::Network
        );
        assert_eq!(
            AppError::Engine(EngineError::InvalidAge(130)).kind(),
            FailureKind::Validation
        );
        assert_eq!(
            AppError::Engine(EngineError::Export("x".to_string())).kind(),
            FailureKind::Local
        );
    }

    #[test]
    fn login_rejection_is_generic() {
        assert_eq!(
            AppError::LoginRejected.notification(),
            "Credenciais incorretas ou servidor indisponível."
        );
    }
}
