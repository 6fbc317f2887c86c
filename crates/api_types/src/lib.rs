//! Wire contracts of the FinanceCore Gateway.
//!
//! The Gateway speaks Portuguese camelCase JSON; every field is mapped
//! explicitly so the rest of the workspace can use English names.
use serde::{Deserialize, Serialize};

/// Body of a Gateway error response, when it sends one.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod person {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PersonView {
        pub id: i64,
        #[serde(rename = "nome")]
        pub name: String,
        #[serde(rename = "idade")]
        pub age: i64,
    }

    /// Request body of `POST Pessoas` and `PUT Pessoas/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PersonWrite {
        #[serde(rename = "nome")]
        pub name: String,
        #[serde(rename = "idade")]
        pub age: i64,
    }
}

pub mod category {
    use super::*;

    /// What kind of transaction a category may be used for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum Purpose {
        #[serde(rename = "Despesa")]
        Expense,
        #[serde(rename = "Receita")]
        Income,
        #[serde(rename = "Ambas")]
        Both,
    }

    impl Purpose {
        /// Wire/display label used by the Gateway.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Expense => "Despesa",
                Self::Income => "Receita",
                Self::Both => "Ambas",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        #[serde(rename = "descricao")]
        pub description: String,
        #[serde(rename = "finalidade")]
        pub purpose: Purpose,
    }

    /// Request body of `POST Categorias`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryNew {
        #[serde(rename = "descricao")]
        pub description: String,
        #[serde(rename = "finalidade")]
        pub purpose: Purpose,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum TransactionKind {
        #[serde(rename = "Despesa")]
        Expense,
        #[serde(rename = "Receita")]
        Income,
    }

    impl TransactionKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Expense => "Despesa",
                Self::Income => "Receita",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        #[serde(rename = "descricao")]
        pub description: String,
        /// Amount in major units (reais).
        #[serde(rename = "valor")]
        pub amount: f64,
        #[serde(rename = "tipo")]
        pub kind: TransactionKind,
        #[serde(rename = "categoriaId")]
        pub category_id: i64,
        #[serde(rename = "pessoaId")]
        pub person_id: i64,
        /// `YYYY-MM-DD`, or a date-time whose date part is the due date.
        #[serde(rename = "dataVencimento")]
        pub due_date: String,
        #[serde(rename = "pago", default)]
        pub paid: bool,
    }

    /// Request body of `POST Transacoes`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "descricao")]
        pub description: String,
        #[serde(rename = "valor")]
        pub amount: f64,
        #[serde(rename = "tipo")]
        pub kind: TransactionKind,
        #[serde(rename = "pessoaId")]
        pub person_id: i64,
        #[serde(rename = "categoriaId")]
        pub category_id: i64,
        #[serde(rename = "dataVencimento")]
        pub due_date: String,
        #[serde(rename = "pago")]
        pub paid: bool,
    }
}

pub mod user {
    use super::*;

    /// A user account as listed by the Gateway.
    ///
    /// Has no password field; a `senha` key in the payload is dropped during
    /// deserialization.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        #[serde(rename = "nome")]
        pub name: String,
        pub email: String,
        #[serde(rename = "cpf", default)]
        pub tax_id: String,
        #[serde(rename = "telefone", default)]
        pub phone: String,
        #[serde(rename = "ativo", default)]
        pub active: bool,
    }

    /// Request body of `POST Usuarios` and `PUT Usuarios/{id}`.
    ///
    /// `password` is omitted from the JSON when `None`, which the Gateway
    /// reads as "keep the current password" on update.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserWrite {
        #[serde(rename = "nome")]
        pub name: String,
        pub email: String,
        #[serde(rename = "cpf")]
        pub tax_id: String,
        #[serde(rename = "telefone")]
        pub phone: String,
        #[serde(rename = "senha", skip_serializing_if = "Option::is_none")]
        pub password: Option<String>,
        #[serde(rename = "ativo")]
        pub active: bool,
    }
}

pub mod auth {
    use super::*;

    /// Request body of `POST Auth/Login`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        #[serde(rename = "senha")]
        pub password: String,
    }

    /// Successful login: an opaque bearer token plus the display name.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        #[serde(rename = "nome")]
        pub name: String,
    }
}

pub mod totals {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GrandTotalView {
        #[serde(rename = "totalReceitas", alias = "totalIncome")]
        pub total_income: f64,
        #[serde(rename = "totalDespesas", alias = "totalExpense")]
        pub total_expense: f64,
        #[serde(rename = "saldo", alias = "balance")]
        pub balance: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PersonTotalView {
        #[serde(alias = "personId")]
        pub id: i64,
        #[serde(rename = "nome", alias = "name")]
        pub name: String,
        #[serde(rename = "totalReceitas", alias = "totalIncome")]
        pub total_income: f64,
        #[serde(rename = "totalDespesas", alias = "totalExpense")]
        pub total_expense: f64,
        #[serde(rename = "saldo", alias = "balance")]
        pub balance: f64,
    }

    /// Response of `GET Totais/Pessoas`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TotalsResponse {
        #[serde(rename = "totalGeral", alias = "grandTotal")]
        pub grand_total: GrandTotalView,
        #[serde(rename = "totaisPorPessoa", alias = "perPersonTotals", default)]
        pub per_person: Vec<PersonTotalView>,
    }
}
