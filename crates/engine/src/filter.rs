use chrono::NaiveDate;

use crate::{Category, Directory, Purpose, Transaction};

/// Predicates of the transactions search box.
///
/// Both dates are inclusive. An empty term matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub term: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    #[must_use]
    pub fn to(mut self, to: Option<NaiveDate>) -> Self {
        self.to = to;
        self
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Applies `filter` to `transactions`, preserving their order.
///
/// The term is matched case-insensitively as a substring of the description,
/// the joined person name or the joined category description. Ids missing
/// from `directory` join as the empty string.
pub fn filter_transactions<'a, I>(
    transactions: I,
    directory: &Directory<'_>,
    filter: &TransactionFilter,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let term = filter.term.to_lowercase();
    transactions
        .into_iter()
        .filter(|tx| filter.in_range(tx.due_date))
        .filter(|tx| {
            if term.is_empty() {
                return true;
            }
            let person = directory.person_name(tx.person_id).unwrap_or_default();
            let category = directory
                .category_description(tx.category_id)
                .unwrap_or_default();
            [tx.description.as_str(), person, category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

/// Purpose selector of the categories page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PurposeFilter {
    #[default]
    All,
    Only(Purpose),
}

impl PurposeFilter {
    pub fn matches(self, purpose: Purpose) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == purpose,
        }
    }
}

pub fn filter_categories(categories: &[Category], filter: PurposeFilter) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| filter.matches(c.purpose))
        .collect()
}
