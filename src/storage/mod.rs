// Persistence traits; the sea-orm implementation lives in `db`

pub mod db;

use thiserror::Error;

use crate::domain::models::{Book, NewBook, NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User records, each carrying its embedded library.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
    /// Overwrites the whole record, library included. Last write wins.
    async fn save(&self, user: &User) -> StoreResult<()>;
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Books in insertion order, optionally restricted to one author.
    async fn list(&self, author: Option<&str>) -> StoreResult<Vec<Book>>;
    async fn insert(&self, book: NewBook) -> StoreResult<Book>;
    async fn count(&self) -> StoreResult<u64>;
}

#[cfg(test)]
pub(crate) async fn test_db() -> sea_orm::DatabaseConnection {
    use migration::MigratorTrait;

    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}
