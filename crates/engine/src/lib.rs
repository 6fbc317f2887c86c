//! Pure core of FinanceCore.
//!
//! Everything here is synchronous and side-effect free: the dashboard crate
//! fetches Gateway data, converts it into the domain types ([`Person`],
//! [`Category`], [`Transaction`]) and runs them through filtering,
//! pagination, aggregation and export.
pub use error::EngineError;
pub use export::{CellValue, Column, Export, ExportFormat, Table};
pub use filter::{PurposeFilter, TransactionFilter, filter_categories, filter_transactions};
pub use model::{
    Category, Directory, Person, Purpose, Transaction, TransactionKind, UserAccount,
    parse_due_date,
};
pub use money::MoneyCents;
pub use pagination::{DEFAULT_PAGE_SIZE, LoadMore, cumulative, page_window};
pub use totals::{
    GrandTotal, PersonTotal, RiskLevel, TotalField, Totals, TotalsMismatch, aggregate,
    pending_expenses,
};
pub use validation::{CategoryDraft, PersonDraft, TransactionDraft, UserDraft};

mod error;
pub mod export;
mod filter;
mod model;
mod money;
mod pagination;
pub mod totals;
mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
