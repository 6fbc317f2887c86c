use comfy_table::Color;
use engine::{MoneyCents, RiskLevel, TransactionKind};

/// Semantic color of a rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Positive,
    Negative,
    Warning,
}

impl Tone {
    pub fn of_kind(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Positive,
            TransactionKind::Expense => Self::Negative,
        }
    }

    /// Zero balances render as positive.
    pub fn of_balance(balance: MoneyCents) -> Self {
        if balance.is_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    pub fn of_risk(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Stable => Self::Positive,
            RiskLevel::Warning => Self::Warning,
            RiskLevel::Critical => Self::Negative,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Self::Plain => None,
            Self::Positive => Some(Color::Green),
            Self::Negative => Some(Color::Red),
            Self::Warning => Some(Color::Yellow),
        }
    }
}
