//! Domain model and the conversions from Gateway wire records.
//!
//! Wire records are untrusted: each one goes through `TryFrom` and a record
//! that does not fit the model rejects the whole batch.
use std::collections::HashMap;

use api_types::{
    category::CategoryView, person::PersonView, transaction::TransactionView, user::UserView,
};
use chrono::NaiveDate;

use crate::{EngineError, MoneyCents, ResultEngine, validation};

pub use api_types::{category::Purpose, transaction::TransactionKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: u8,
}

impl TryFrom<PersonView> for Person {
    type Error = EngineError;

    fn try_from(value: PersonView) -> ResultEngine<Self> {
        Ok(Self {
            id: value.id,
            name: value.name,
            age: validation::check_age(value.age)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub description: String,
    pub purpose: Purpose,
}

impl From<CategoryView> for Category {
    fn from(value: CategoryView) -> Self {
        Self {
            id: value.id,
            description: value.description,
            purpose: value.purpose,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    /// Always at least one cent; the kind carries the direction.
    pub amount: MoneyCents,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub person_id: i64,
    pub due_date: NaiveDate,
    pub paid: bool,
}

impl TryFrom<TransactionView> for Transaction {
    type Error = EngineError;

    fn try_from(value: TransactionView) -> ResultEngine<Self> {
        let amount = MoneyCents::from_major(value.amount)?;
        validation::check_amount(amount)?;
        Ok(Self {
            id: value.id,
            description: value.description,
            amount,
            kind: value.kind,
            category_id: value.category_id,
            person_id: value.person_id,
            due_date: parse_due_date(&value.due_date)?,
            paid: value.paid,
        })
    }
}

/// A user account. The password never reaches the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub phone: String,
    pub active: bool,
}

impl From<UserView> for UserAccount {
    fn from(value: UserView) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            tax_id: value.tax_id,
            phone: value.phone,
            active: value.active,
        }
    }
}

/// Parses a Gateway due date.
///
/// Accepts `YYYY-MM-DD` and any date-time starting with it
/// (`2026-02-10T00:00:00`, `2026-02-10T00:00:00Z`, ...).
pub fn parse_due_date(raw: &str) -> ResultEngine<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = match trimmed.get(..10) {
        Some(prefix) if trimmed.len() == 10 || trimmed[10..].starts_with(['T', ' ']) => prefix,
        _ => trimmed,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(raw.to_string()))
}

/// Id lookups used to join transactions with people and categories.
#[derive(Debug, Default)]
pub struct Directory<'a> {
    people: HashMap<i64, &'a Person>,
    categories: HashMap<i64, &'a Category>,
}

impl<'a> Directory<'a> {
    pub fn new(people: &'a [Person], categories: &'a [Category]) -> Self {
        Self {
            people: people.iter().map(|p| (p.id, p)).collect(),
            categories: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn person(&self, id: i64) -> Option<&'a Person> {
        self.people.get(&id).copied()
    }

    pub fn person_name(&self, id: i64) -> Option<&'a str> {
        self.person(id).map(|p| p.name.as_str())
    }

    pub fn category(&self, id: i64) -> Option<&'a Category> {
        self.categories.get(&id).copied()
    }

    pub fn category_description(&self, id: i64) -> Option<&'a str> {
        self.category(id).map(|c| c.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_tx(amount: f64, due: &str) -> TransactionView {
        TransactionView {
            id: 1,
            description: "Luz".to_string(),
            amount,
            kind: TransactionKind::Expense,
            category_id: 1,
            person_id: 1,
            due_date: due.to_string(),
            paid: false,
        }
    }

    #[test]
    fn due_date_accepts_date_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        assert_eq!(parse_due_date("2026-02-10").unwrap(), expected);
        assert_eq!(parse_due_date("2026-02-10T00:00:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-02-10T13:45:00Z").unwrap(), expected);
    }

    #[test]
    fn due_date_rejects_garbage() {
        assert!(matches!(
            parse_due_date("10/02/2026"),
            Err(EngineError::InvalidDate(_))
        ));
        assert!(parse_due_date("2026-02-10garbage").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn transaction_conversion_validates_amount() {
        let tx = Transaction::try_from(wire_tx(99.99, "2026-03-01")).unwrap();
        assert_eq!(tx.amount.cents(), 9999);

        assert!(Transaction::try_from(wire_tx(0.0, "2026-03-01")).is_err());
        assert!(Transaction::try_from(wire_tx(-5.0, "2026-03-01")).is_err());
        assert!(Transaction::try_from(wire_tx(10.0, "not a date")).is_err());
    }

    #[test]
    fn person_conversion_validates_age() {
        let ok = PersonView {
            id: 1,
            name: "Ana".to_string(),
            age: 120,
        };
        assert_eq!(Person::try_from(ok).unwrap().age, 120);

        let too_old = PersonView {
            id: 2,
            name: "Bia".to_string(),
            age: 121,
        };
        assert_eq!(
            Person::try_from(too_old).unwrap_err(),
            EngineError::InvalidAge(121)
        );
    }

    #[test]
    fn directory_resolves_known_ids_only() {
        let people = vec![Person {
            id: 1,
            name: "Ana".to_string(),
            age: 30,
        }];
        let categories = vec![Category {
            id: 5,
            description: "Mercado".to_string(),
            purpose: Purpose::Expense,
        }];
        let directory = Directory::new(&people, &categories);
        assert_eq!(directory.person_name(1), Some("Ana"));
        assert_eq!(directory.person_name(2), None);
        assert_eq!(directory.category_description(5), Some("Mercado"));
        assert_eq!(directory.category_description(1), None);
    }
}
