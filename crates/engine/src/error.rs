//! The module contains the errors the engine can return.
//!
//! Every variant except [`Xlsx`] and [`Csv`] is a validation failure: either a
//! form the user filled in, or a record the Gateway sent that does not fit
//! the domain model.
//!
//!  [`Xlsx`]: EngineError::Xlsx
//!  [`Csv`]: EngineError::Csv
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid age: {0} (expected 0..=120)")]
    InvalidAge(i64),
    #[error("Invalid date: \"{0}\"")]
    InvalidDate(String),
    #[error("\"{0}\" is required")]
    MissingField(&'static str),
    #[error("Invalid email: \"{0}\"")]
    InvalidEmail(String),
    #[error("Totals do not fit in the amount range")]
    AmountOverflow,
    #[error("Unknown {field} id {id}")]
    UnknownReference { field: &'static str, id: i64 },
    #[error("Export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl EngineError {
    /// Returns `true` for errors caused by invalid input rather than by the
    /// export backends.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Export(_) | Self::Xlsx(_) | Self::Csv(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidAge(a), Self::InvalidAge(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidEmail(a), Self::InvalidEmail(b)) => a == b,
            (
                Self::UnknownReference { field: a, id: x },
                Self::UnknownReference { field: b, id: y },
            ) => a == b && x == y,
            (Self::AmountOverflow, Self::AmountOverflow) => true,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Xlsx(a), Self::Xlsx(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
