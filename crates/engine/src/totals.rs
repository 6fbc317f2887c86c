//! Income/expense aggregation behind the dashboard.
//!
//! The Gateway publishes its own totals (`Totais/Pessoas`) and the dashboard
//! displays those. [`aggregate`] recomputes them from the raw transactions so
//! the two can be compared with [`Totals::compare`].
use std::collections::HashMap;

use api_types::totals::{GrandTotalView, PersonTotalView, TotalsResponse};

use crate::{EngineError, MoneyCents, Person, ResultEngine, Transaction, TransactionKind};

/// Share of income above which spending is critical (exclusive).
pub const CRITICAL_ABOVE: f64 = 90.0;
/// Share of income above which spending needs attention (exclusive).
pub const WARNING_ABOVE: f64 = 70.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrandTotal {
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    pub balance: MoneyCents,
}

impl GrandTotal {
    pub fn new(total_income: MoneyCents, total_expense: MoneyCents) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }

    /// Expenses as a percentage of income; 0 when there is no income.
    pub fn commitment_percentage(&self) -> f64 {
        if self.total_income.cents() <= 0 {
            return 0.0;
        }
        self.total_expense.cents() as f64 * 100.0 / self.total_income.cents() as f64
    }

    pub fn risk(&self) -> RiskLevel {
        RiskLevel::classify(self.commitment_percentage())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonTotal {
    pub person_id: i64,
    pub name: String,
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub grand: GrandTotal,
    pub per_person: Vec<PersonTotal>,
}

/// Risk band of the committed-income percentage.
///
/// Boundaries belong to the lower band: exactly 90% is a warning, exactly
/// 70% is stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskLevel {
    Stable,
    Warning,
    Critical,
}

impl RiskLevel {
    pub fn classify(percentage: f64) -> Self {
        if percentage > CRITICAL_ABOVE {
            Self::Critical
        } else if percentage > WARNING_ABOVE {
            Self::Warning
        } else {
            Self::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "ESTÁVEL",
            Self::Warning => "ATENÇÃO",
            Self::Critical => "CRÍTICO",
        }
    }
}

/// Computes per-person and grand totals from raw transactions.
///
/// Per-person rows follow the order of `people`. Transactions of unknown
/// people count towards the grand total only. Fails with
/// [`EngineError::AmountOverflow`] when a sum leaves the cents range.
pub fn aggregate(transactions: &[Transaction], people: &[Person]) -> ResultEngine<Totals> {
    let add = |total: MoneyCents, amount: MoneyCents| {
        total
            .checked_add(amount)
            .ok_or(EngineError::AmountOverflow)
    };

    let mut income = MoneyCents::ZERO;
    let mut expense = MoneyCents::ZERO;
    let mut by_person: HashMap<i64, (MoneyCents, MoneyCents)> = HashMap::new();

    for tx in transactions {
        let entry = by_person.entry(tx.person_id).or_default();
        match tx.kind {
            TransactionKind::Income => {
                income = add(income, tx.amount)?;
                entry.0 = add(entry.0, tx.amount)?;
            }
            TransactionKind::Expense => {
                expense = add(expense, tx.amount)?;
                entry.1 = add(entry.1, tx.amount)?;
            }
        }
    }

    let per_person = people
        .iter()
        .map(|person| {
            let (total_income, total_expense) =
                by_person.get(&person.id).copied().unwrap_or_default();
            PersonTotal {
                person_id: person.id,
                name: person.name.clone(),
                total_income,
                total_expense,
                balance: total_income - total_expense,
            }
        })
        .collect();

    Ok(Totals {
        grand: GrandTotal::new(income, expense),
        per_person,
    })
}

/// Unpaid expenses, in list order.
pub fn pending_expenses(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| !tx.paid && tx.kind == TransactionKind::Expense)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalField {
    Income,
    Expense,
    Balance,
}

impl TotalField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "totalIncome",
            Self::Expense => "totalExpense",
            Self::Balance => "balance",
        }
    }
}

/// A difference between locally computed and Gateway-published totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TotalsMismatch {
    Grand {
        field: TotalField,
        local: MoneyCents,
        remote: MoneyCents,
    },
    Person {
        person_id: i64,
        field: TotalField,
        local: MoneyCents,
        remote: MoneyCents,
    },
    /// Person present locally, absent from the Gateway's totals.
    MissingRemote { person_id: i64 },
    /// Person reported by the Gateway but unknown locally.
    MissingLocal { person_id: i64 },
}

fn field_values(
    income: MoneyCents,
    expense: MoneyCents,
    balance: MoneyCents,
) -> [(TotalField, MoneyCents); 3] {
    [
        (TotalField::Income, income),
        (TotalField::Expense, expense),
        (TotalField::Balance, balance),
    ]
}

impl Totals {
    /// Lists every difference between `self` (local) and `remote`.
    pub fn compare(&self, remote: &Totals) -> Vec<TotalsMismatch> {
        let mut out = Vec::new();

        let local_grand = field_values(
            self.grand.total_income,
            self.grand.total_expense,
            self.grand.balance,
        );
        let remote_grand = field_values(
            remote.grand.total_income,
            remote.grand.total_expense,
            remote.grand.balance,
        );
        for ((field, local), (_, remote)) in local_grand.into_iter().zip(remote_grand) {
            if local != remote {
                out.push(TotalsMismatch::Grand {
                    field,
                    local,
                    remote,
                });
            }
        }

        let remote_by_id: HashMap<i64, &PersonTotal> =
            remote.per_person.iter().map(|p| (p.person_id, p)).collect();
        for local in &self.per_person {
            let Some(theirs) = remote_by_id.get(&local.person_id) else {
                out.push(TotalsMismatch::MissingRemote {
                    person_id: local.person_id,
                });
                continue;
            };
            let ours = field_values(local.total_income, local.total_expense, local.balance);
            let theirs = field_values(theirs.total_income, theirs.total_expense, theirs.balance);
            for ((field, local_value), (_, remote_value)) in ours.into_iter().zip(theirs) {
                if local_value != remote_value {
                    out.push(TotalsMismatch::Person {
                        person_id: local.person_id,
                        field,
                        local: local_value,
                        remote: remote_value,
                    });
                }
            }
        }

        for theirs in &remote.per_person {
            if !self
                .per_person
                .iter()
                .any(|p| p.person_id == theirs.person_id)
            {
                out.push(TotalsMismatch::MissingLocal {
                    person_id: theirs.person_id,
                });
            }
        }

        out
    }
}

impl TryFrom<GrandTotalView> for GrandTotal {
    type Error = EngineError;

    fn try_from(value: GrandTotalView) -> ResultEngine<Self> {
        Ok(Self {
            total_income: MoneyCents::from_major(value.total_income)?,
            total_expense: MoneyCents::from_major(value.total_expense)?,
            balance: MoneyCents::from_major(value.balance)?,
        })
    }
}

impl TryFrom<PersonTotalView> for PersonTotal {
    type Error = EngineError;

    fn try_from(value: PersonTotalView) -> ResultEngine<Self> {
        Ok(Self {
            person_id: value.id,
            name: value.name,
            total_income: MoneyCents::from_major(value.total_income)?,
            total_expense: MoneyCents::from_major(value.total_expense)?,
            balance: MoneyCents::from_major(value.balance)?,
        })
    }
}

impl TryFrom<TotalsResponse> for Totals {
    type Error = EngineError;

    /// Keeps the Gateway's numbers as-is, including its balances.
    fn try_from(value: TotalsResponse) -> ResultEngine<Self> {
        Ok(Self {
            grand: value.grand_total.try_into()?,
            per_person: value
                .per_person
                .into_iter()
                .map(PersonTotal::try_from)
                .collect::<ResultEngine<_>>()?,
        })
    }
}
