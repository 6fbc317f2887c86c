pub mod pages;

use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

use api_types::auth::LoginRequest;
use chrono::Utc;
use engine::{
    CategoryDraft, EngineError, ExportFormat, LoadMore, PersonDraft, Table, TransactionDraft,
    TransactionFilter, UserDraft, export,
};

use crate::{
    cli::{
        CategoriesCmd, ColorMode, Command, LoginArgs, PeopleCmd, TransactionsCmd, UserFields,
        UsersCmd, purpose_filter,
    },
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    local_state::{LocalState, Session},
    login::{LoginGate, LoginState},
    ui::{self, Renderer},
};

use pages::{CategoriesPage, DashboardPage, PeoplePage, TransactionsPage, UsersPage};

pub struct App {
    config: AppConfig,
    client: Client,
    state: LocalState,
    render: Renderer,
}

impl App {
    pub fn new(config: AppConfig, color: ColorMode) -> Result<Self> {
        let state = LocalState::load(&config.state_path)?;
        let mut client = Client::new(&config.base_url, config.request_timeout())?;
        if let Some(session) = &state.session {
            client = client.with_token(session.token.clone());
        }
        let color = match color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };
        Ok(Self {
            config,
            client,
            state,
            render: Renderer::new(color),
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        if !matches!(command, Command::Login(_) | Command::Logout) && self.session().is_none() {
            return Err(AppError::NotLoggedIn);
        }

        match command {
            Command::Login(args) => self.login(args).await,
            Command::Logout => self.logout(),
            Command::Dashboard => self.dashboard().await,
            Command::People(cmd) => self.people(cmd).await,
            Command::Categories(cmd) => self.categories(cmd).await,
            Command::Transactions(cmd) => self.transactions(cmd).await,
            Command::Users(cmd) => self.users(cmd).await,
        }
    }

    async fn login(&mut self, args: LoginArgs) -> Result<()> {
        let password = ui::prompt::password("Senha: ")?;
        let session = self.sign_in(&args.email, password).await?;
        println!("Bem-vindo, {}!", session.display_name);
        Ok(())
    }

    /// Runs the login gate and persists the session it yields.
    ///
    /// Nothing is stored when the gate rejects the credentials.
    pub async fn sign_in(&mut self, email: &str, password: String) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(EngineError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(EngineError::MissingField("password").into());
        }

        // Fresh client: a stale token must not ride along with the login.
        let client = Client::new(&self.config.base_url, self.config.request_timeout())?;
        let request = LoginRequest {
            email: email.to_string(),
            password,
        };

        eprintln!("VALIDANDO COM SERVIDOR...");
        let mut gate = LoginGate::new(self.config.login_floor());
        let LoginState::Authenticated(session) = gate.submit(email, client.login(&request)).await
        else {
            return Err(AppError::LoginRejected);
        };
        let session = session.clone();

        self.state.sign_in(session.clone());
        self.state.save(&self.config.state_path)?;
        self.client = client.with_token(session.token.clone());
        Ok(session)
    }

    pub fn logout(&mut self) -> Result<()> {
        if self.state.sign_out() {
            self.state.save(&self.config.state_path)?;
            tracing::info!("session cleared");
            println!("Sessão encerrada.");
        } else {
            println!("Nenhuma sessão ativa.");
        }
        Ok(())
    }

    async fn dashboard(&mut self) -> Result<()> {
        let mut page = DashboardPage::default();
        page.load(&self.client).await?;

        let mismatches = page.mismatches()?;
        for mismatch in &mismatches {
            tracing::warn!(mismatch = ?mismatch, "gateway totals differ from local aggregation");
        }
        let Some(remote) = &page.remote else {
            return Ok(());
        };
        println!(
            "{}",
            self.render.dashboard(remote, &page.pending(), &mismatches)
        );
        Ok(())
    }

    async fn people(&mut self, cmd: PeopleCmd) -> Result<()> {
        match cmd {
            PeopleCmd::List(args) => self.show_people(args.page).await,
            PeopleCmd::Add { name, age } => {
                let body = PersonDraft { name, age }.validate()?;
                self.client.person_create(&body).await?;
                tracing::info!(name = %body.name, "person created");
                println!("Pessoa cadastrada.");
                self.show_people(1).await
            }
            PeopleCmd::Update { id, name, age } => {
                let body = PersonDraft { name, age }.validate()?;
                self.client.person_update(id, &body).await?;
                tracing::info!(id, "person updated");
                println!("Pessoa atualizada.");
                self.show_people(1).await
            }
            PeopleCmd::Remove { id } => {
                self.client.person_delete(id).await?;
                tracing::info!(id, "person removed");
                println!("Pessoa removida.");
                self.show_people(1).await
            }
            PeopleCmd::Export(args) => {
                let mut page = PeoplePage::default();
                page.load(&self.client).await?;
                let table = export::people_table(page.people.items());
                let stem = export::dated_file_stem("Pessoas", self.config.today()?);
                self.write_export(&table, args.format.into(), &stem)?;
                Ok(())
            }
        }
    }

    async fn show_people(&self, page_number: usize) -> Result<()> {
        let mut page = PeoplePage::default();
        page.load(&self.client).await?;
        let people = page.people.items();
        let pages = LoadMore::at(self.config.page_size, page_number);
        println!(
            "{}",
            self.render
                .people(pages.visible(people), people.len(), &pages)
        );
        Ok(())
    }

    async fn categories(&mut self, cmd: CategoriesCmd) -> Result<()> {
        match cmd {
            CategoriesCmd::List { purpose } => {
                let mut page = CategoriesPage::default();
                page.load(&self.client).await?;
                println!(
                    "{}",
                    self.render.categories(&page.filtered(purpose_filter(purpose)))
                );
                Ok(())
            }
            CategoriesCmd::Add {
                description,
                purpose,
            } => {
                let body = CategoryDraft {
                    description,
                    purpose: purpose.into(),
                }
                .validate()?;
                self.client.category_create(&body).await?;
                tracing::info!(description = %body.description, "category created");
                println!("Categoria cadastrada.");

                let mut page = CategoriesPage::default();
                page.load(&self.client).await?;
                println!(
                    "{}",
                    self.render.categories(&page.filtered(purpose_filter(None)))
                );
                Ok(())
            }
            CategoriesCmd::Export { purpose, export } => {
                let mut page = CategoriesPage::default();
                page.load(&self.client).await?;
                let table = export::categories_table(page.filtered(purpose_filter(purpose)));
                let stem = export::dated_file_stem("Categorias", self.config.today()?);
                self.write_export(&table, export.format.into(), &stem)?;
                Ok(())
            }
        }
    }

    async fn transactions(&mut self, cmd: TransactionsCmd) -> Result<()> {
        match cmd {
            TransactionsCmd::List { search, page } => {
                self.show_transactions(&search.filter(), page.page).await
            }
            TransactionsCmd::Add {
                description,
                amount,
                kind,
                person,
                category,
                due,
                paid,
            } => {
                let due_date = match due {
                    Some(date) => date,
                    None => self.config.today()?,
                };
                let draft = TransactionDraft {
                    description,
                    amount,
                    kind: kind.into(),
                    person_id: person,
                    category_id: category,
                    due_date,
                    paid,
                };
                let body = draft.validate()?;

                let mut page = TransactionsPage::default();
                page.load(&self.client).await?;
                draft.check_references(&page.directory())?;

                self.client.transaction_create(&body).await?;
                tracing::info!(amount = %amount, kind = draft.kind.as_str(), "transaction created");
                println!("Transação registrada.");
                self.show_transactions(&TransactionFilter::default(), 1)
                    .await
            }
            TransactionsCmd::Export { search, export } => {
                let mut page = TransactionsPage::default();
                page.load(&self.client).await?;
                let rows = page.rows(&search.filter());
                let table = export::transactions_table(rows.iter().copied(), &page.directory());
                let stem = export::transactions_file_stem(Utc::now());
                self.write_export(&table, export.format.into(), &stem)?;
                Ok(())
            }
        }
    }

    async fn show_transactions(&self, filter: &TransactionFilter, page_number: usize) -> Result<()> {
        let mut page = TransactionsPage::default();
        page.load(&self.client).await?;
        let rows = page.rows(filter);
        let pages = LoadMore::at(self.config.page_size, page_number);
        println!(
            "{}",
            self.render.transactions(
                pages.visible(&rows),
                &page.directory(),
                rows.len(),
                &pages
            )
        );
        Ok(())
    }

    async fn users(&mut self, cmd: UsersCmd) -> Result<()> {
        match cmd {
            UsersCmd::List => self.show_users().await,
            UsersCmd::Add(fields) => {
                let draft = user_draft(fields, Some(ui::prompt::new_password()?));
                let body = draft.validate_new()?;
                self.client.user_create(&body).await?;
                tracing::info!(email = %body.email, "user created");
                println!("Usuário cadastrado.");
                self.show_users().await
            }
            UsersCmd::Update {
                id,
                fields,
                change_password,
            } => {
                let password = if change_password {
                    Some(ui::prompt::new_password()?)
                } else {
                    None
                };
                let body = user_draft(fields, password).validate_update()?;
                self.client.user_update(id, &body).await?;
                tracing::info!(id, "user updated");
                println!("Usuário atualizado.");
                self.show_users().await
            }
            UsersCmd::Remove { id } => {
                self.client.user_delete(id).await?;
                tracing::info!(id, "user removed");
                println!("Usuário removido.");
                self.show_users().await
            }
        }
    }

    async fn show_users(&self) -> Result<()> {
        let mut page = UsersPage::default();
        page.load(&self.client).await?;
        println!("{}", self.render.users(page.users.items()));
        Ok(())
    }

    fn write_export(&self, table: &Table, format: ExportFormat, stem: &str) -> Result<PathBuf> {
        let path = write_export(Path::new(&self.config.export_dir), table, format, stem)?;
        println!("Arquivo gerado: {}", path.display());
        Ok(path)
    }
}

fn user_draft(fields: UserFields, password: Option<String>) -> UserDraft {
    UserDraft {
        name: fields.name,
        email: fields.email,
        tax_id: fields.tax_id,
        phone: fields.phone,
        password,
        active: !fields.inactive,
    }
}

/// Encodes `table` and writes it under `dir`, creating the directory.
pub fn write_export(
    dir: &Path,
    table: &Table,
    format: ExportFormat,
    stem: &str,
) -> Result<PathBuf> {
    let file = table.export(format, stem)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(&file.file_name);
    fs::write(&path, &file.bytes)?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "export written");
    Ok(path)
}
