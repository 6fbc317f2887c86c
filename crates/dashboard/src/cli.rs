use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    ExportFormat, MoneyCents, Purpose, PurposeFilter, TransactionFilter, TransactionKind,
};

use crate::config::ConfigArgs;

#[derive(Debug, Parser)]
#[command(
    name = "financecore",
    about = "Household finance dashboard for the FinanceCore Gateway",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Totals, commitment risk, pending bills.
    Dashboard,
    #[command(subcommand)]
    People(PeopleCmd),
    #[command(subcommand)]
    Categories(CategoriesCmd),
    #[command(subcommand)]
    Transactions(TransactionsCmd),
    #[command(subcommand)]
    Users(UsersCmd),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email; the password is always prompted.
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => Self::Xlsx,
            FormatArg::Csv => Self::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PurposeArg {
    Expense,
    Income,
    Both,
}

impl From<PurposeArg> for Purpose {
    fn from(value: PurposeArg) -> Self {
        match value {
            PurposeArg::Expense => Self::Expense,
            PurposeArg::Income => Self::Income,
            PurposeArg::Both => Self::Both,
        }
    }
}

pub fn purpose_filter(purpose: Option<PurposeArg>) -> PurposeFilter {
    purpose.map_or(PurposeFilter::All, |p| PurposeFilter::Only(p.into()))
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Expense,
    Income,
}

impl From<KindArg> for TransactionKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Expense => Self::Expense,
            KindArg::Income => Self::Income,
        }
    }
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Number of "load more" steps to reveal.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    pub format: FormatArg,
}

#[derive(Debug, Subcommand)]
pub enum PeopleCmd {
    List(PageArgs),
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        age: i64,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        age: i64,
    },
    Remove {
        #[arg(long)]
        id: i64,
    },
    Export(ExportArgs),
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCmd {
    List {
        #[arg(long, value_enum)]
        purpose: Option<PurposeArg>,
    },
    Add {
        #[arg(long)]
        description: String,
        #[arg(long, value_enum, default_value_t = PurposeArg::Both)]
        purpose: PurposeArg,
    },
    Export {
        #[arg(long, value_enum)]
        purpose: Option<PurposeArg>,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Matches description, person name or category description.
    #[arg(long, default_value = "")]
    pub search: String,
    /// Earliest due date (inclusive, YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest due date (inclusive, YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl SearchArgs {
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter::new(self.search.clone())
            .from(self.from)
            .to(self.to)
    }
}

#[derive(Debug, Subcommand)]
pub enum TransactionsCmd {
    List {
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    Add {
        #[arg(long)]
        description: String,
        /// Amount in reais, e.g. `152,40` or `152.40`.
        #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
        amount: MoneyCents,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        person: i64,
        #[arg(long)]
        category: i64,
        /// Defaults to today in the configured timezone.
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        paid: bool,
    },
    Export {
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Args)]
pub struct UserFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub tax_id: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Subcommand)]
pub enum UsersCmd {
    List,
    /// Create an account; the password is prompted.
    Add(UserFields),
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: UserFields,
        /// Prompt for a new password; otherwise it stays unchanged.
        #[arg(long)]
        change_password: bool,
    },
    Remove {
        #[arg(long)]
        id: i64,
    },
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_transaction_add() {
        let cli = Cli::try_parse_from([
            "financecore",
            "transactions",
            "add",
            "--description",
            "Aluguel",
            "--amount",
            "1500,00",
            "--kind",
            "expense",
            "--person",
            "1",
            "--category",
            "2",
        ])
        .unwrap();
        let Command::Transactions(TransactionsCmd::Add {
            amount, due, paid, ..
        }) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(amount, MoneyCents::new(150_000));
        assert_eq!(due, None);
        assert!(!paid);
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "financecore",
            "people",
            "list",
            "--page",
            "3",
            "--base-url",
            "http://localhost:5000/api/",
        ])
        .unwrap();
        assert_eq!(
            cli.config.base_url.as_deref(),
            Some("http://localhost:5000/api/")
        );
        assert!(matches!(
            cli.command,
            Command::People(PeopleCmd::List(PageArgs { page: 3 }))
        ));
    }

    #[test]
    fn category_purpose_defaults_to_both() {
        let cli =
            Cli::try_parse_from(["financecore", "categories", "add", "--description", "Lazer"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Categories(CategoriesCmd::Add {
                purpose: PurposeArg::Both,
                ..
            })
        ));
        assert_eq!(purpose_filter(None), PurposeFilter::All);
        assert_eq!(
            purpose_filter(Some(PurposeArg::Income)),
            PurposeFilter::Only(Purpose::Income)
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
