//! Client-side validation of the create/update forms.
//!
//! Each draft validates into the Gateway request body it stands for.
use api_types::{
    category::CategoryNew, person::PersonWrite, transaction::TransactionNew, user::UserWrite,
};
use chrono::NaiveDate;

use crate::{Directory, EngineError, MoneyCents, Purpose, ResultEngine, TransactionKind};

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 120;

pub(crate) fn check_age(age: i64) -> ResultEngine<u8> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(EngineError::InvalidAge(age));
    }
    u8::try_from(age).map_err(|_| EngineError::InvalidAge(age))
}

/// Amounts must be at least one cent.
pub(crate) fn check_amount(amount: MoneyCents) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "{amount} must be at least R$ 0,01"
        )));
    }
    Ok(())
}

fn required(value: &str, field: &'static str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub age: i64,
}

impl PersonDraft {
    pub fn validate(&self) -> ResultEngine<PersonWrite> {
        Ok(PersonWrite {
            name: required(&self.name, "name")?,
            age: i64::from(check_age(self.age)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDraft {
    pub description: String,
    pub purpose: Purpose,
}

impl CategoryDraft {
    pub fn validate(&self) -> ResultEngine<CategoryNew> {
        Ok(CategoryNew {
            description: required(&self.description, "description")?,
            purpose: self.purpose,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: MoneyCents,
    pub kind: TransactionKind,
    pub person_id: i64,
    pub category_id: i64,
    pub due_date: NaiveDate,
    pub paid: bool,
}

impl TransactionDraft {
    pub fn validate(&self) -> ResultEngine<TransactionNew> {
        let description = required(&self.description, "description")?;
        check_amount(self.amount)?;
        Ok(TransactionNew {
            description,
            amount: self.amount.to_major(),
            kind: self.kind,
            person_id: self.person_id,
            category_id: self.category_id,
            due_date: self.due_date.format("%Y-%m-%d").to_string(),
            paid: self.paid,
        })
    }

    /// Person and category must be among the loaded ones.
    pub fn check_references(&self, directory: &Directory<'_>) -> ResultEngine<()> {
        if directory.person(self.person_id).is_none() {
            return Err(EngineError::UnknownReference {
                field: "person",
                id: self.person_id,
            });
        }
        if directory.category(self.category_id).is_none() {
            return Err(EngineError::UnknownReference {
                field: "category",
                id: self.category_id,
            });
        }
        Ok(())
    }
}

/// User account form. `password` is required on create and optional on
/// update, where `None` keeps the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub phone: String,
    pub password: Option<String>,
    pub active: bool,
}

impl UserDraft {
    pub fn validate_new(&self) -> ResultEngine<UserWrite> {
        let body = self.validate_update()?;
        if body.password.is_none() {
            return Err(EngineError::MissingField("password"));
        }
        Ok(body)
    }

    pub fn validate_update(&self) -> ResultEngine<UserWrite> {
        let email = required(&self.email, "email")?;
        if !email.contains('@') {
            return Err(EngineError::InvalidEmail(email));
        }
        let password = match self.password.as_deref() {
            Some(raw) if !raw.is_empty() => Some(raw.to_string()),
            _ => None,
        };
        Ok(UserWrite {
            name: required(&self.name, "name")?,
            email,
            tax_id: self.tax_id.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password,
            active: self.active,
        })
    }
}
