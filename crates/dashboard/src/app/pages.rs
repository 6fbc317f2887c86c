//! Per-page list caches and their loaders.
//!
//! A page fans its Gateway requests out in parallel and only fills its
//! caches once every request succeeded and every record converted. On any
//! failure the page is left empty.
use engine::{
    Category, Directory, EngineError, Person, PurposeFilter, Totals, TotalsMismatch, Transaction,
    TransactionFilter, UserAccount, aggregate, filter_categories, filter_transactions,
    pending_expenses,
};

use crate::{
    client::Client,
    error::{AppError, Result},
};

#[derive(Debug)]
pub struct ListCache<T> {
    items: Vec<T>,
    loaded: bool,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

impl<T> ListCache<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.loaded = false;
    }
}

/// Converts a whole wire list; one invalid record rejects the batch.
fn convert<W, D>(items: Vec<W>) -> Result<Vec<D>>
where
    D: TryFrom<W, Error = EngineError>,
{
    items
        .into_iter()
        .map(D::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

fn settle<T>(cache: &mut ListCache<T>, loaded: Result<Vec<T>>) -> Result<()> {
    match loaded {
        Ok(items) => {
            cache.replace(items);
            Ok(())
        }
        Err(err) => {
            cache.clear();
            Err(err)
        }
    }
}

#[derive(Debug, Default)]
pub struct PeoplePage {
    pub people: ListCache<Person>,
}

impl PeoplePage {
    pub async fn load(&mut self, client: &Client) -> Result<()> {
        let loaded = match client.people().await {
            Ok(people) => convert::<_, Person>(people),
            Err(err) => Err(err.into()),
        };
        settle(&mut self.people, loaded)
    }
}

#[derive(Debug, Default)]
pub struct CategoriesPage {
    pub categories: ListCache<Category>,
}

impl CategoriesPage {
    pub async fn load(&mut self, client: &Client) -> Result<()> {
        let loaded = client
            .categories()
            .await
            .map(|list| list.into_iter().map(Category::from).collect())
            .map_err(AppError::from);
        settle(&mut self.categories, loaded)
    }

    pub fn filtered(&self, filter: PurposeFilter) -> Vec<&Category> {
        filter_categories(self.categories.items(), filter)
    }
}

#[derive(Debug, Default)]
pub struct UsersPage {
    pub users: ListCache<UserAccount>,
}

impl UsersPage {
    pub async fn load(&mut self, client: &Client) -> Result<()> {
        let loaded = client
            .users()
            .await
            .map(|list| list.into_iter().map(UserAccount::from).collect())
            .map_err(AppError::from);
        settle(&mut self.users, loaded)
    }
}

#[derive(Debug, Default)]
pub struct TransactionsPage {
    pub transactions: ListCache<Transaction>,
    pub people: ListCache<Person>,
    pub categories: ListCache<Category>,
}

impl TransactionsPage {
    pub async fn load(&mut self, client: &Client) -> Result<()> {
        let fetched = tokio::try_join!(
            client.transactions(),
            client.people(),
            client.categories()
        );
        let converted = fetched
            .map_err(AppError::from)
            .and_then(|(transactions, people, categories)| {
                Ok((
                    convert::<_, Transaction>(transactions)?,
                    convert::<_, Person>(people)?,
                    categories
                        .into_iter()
                        .map(Category::from)
                        .collect::<Vec<_>>(),
                ))
            });

        match converted {
            Ok((transactions, people, categories)) => {
                self.transactions.replace(transactions);
                self.people.replace(people);
                self.categories.replace(categories);
                Ok(())
            }
            Err(err) => {
                self.transactions.clear();
                self.people.clear();
                self.categories.clear();
                Err(err)
            }
        }
    }

    pub fn directory(&self) -> Directory<'_> {
        Directory::new(self.people.items(), self.categories.items())
    }

    /// Filtered transactions, newest first.
    pub fn rows(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut rows = filter_transactions(self.transactions.items(), &self.directory(), filter);
        rows.reverse();
        rows
    }
}

#[derive(Debug, Default)]
pub struct DashboardPage {
    pub remote: Option<Totals>,
    pub transactions: ListCache<Transaction>,
    pub people: ListCache<Person>,
}

impl DashboardPage {
    pub async fn load(&mut self, client: &Client) -> Result<()> {
        let fetched = tokio::try_join!(client.totals(), client.transactions(), client.people());
        let converted = fetched
            .map_err(AppError::from)
            .and_then(|(totals, transactions, people)| {
                Ok((
                    Totals::try_from(totals)?,
                    convert::<_, Transaction>(transactions)?,
                    convert::<_, Person>(people)?,
                ))
            });

        match converted {
            Ok((totals, transactions, people)) => {
                self.remote = Some(totals);
                self.transactions.replace(transactions);
                self.people.replace(people);
                Ok(())
            }
            Err(err) => {
                self.remote = None;
                self.transactions.clear();
                self.people.clear();
                Err(err)
            }
        }
    }

    /// Totals recomputed from the raw lists.
    pub fn local(&self) -> Result<Totals> {
        Ok(aggregate(self.transactions.items(), self.people.items())?)
    }

    /// Differences between the Gateway's totals and [`Self::local`].
    pub fn mismatches(&self) -> Result<Vec<TotalsMismatch>> {
        match &self.remote {
            Some(remote) => Ok(self.local()?.compare(remote)),
            None => Ok(Vec::new()),
        }
    }

    pub fn pending(&self) -> Vec<&Transaction> {
        pending_expenses(self.transactions.items())
    }
}
