/// Credential store contract
///
/// The auth core depends on three capability groups. A single backing store
/// may implement all of them (both `PgStorage` and `InMemoryStorage` do), but
/// they stay separate traits so each one can be swapped for a fake in tests.
///
/// ## Backends
///
/// - `postgres`: sqlx/PostgreSQL store used by the binary
/// - `memory`: dashmap-backed store for tests and embedding
use crate::models::{App, User};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by a credential store.
///
/// `UserExists`, `UserNotFound` and `AppNotFound` are the recognised signals
/// the auth core recodes; everything else is passed through.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Persists new accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Store a new user and return the id assigned by the store.
    ///
    /// Fails with `StorageError::UserExists` when the email is taken. Two
    /// concurrent saves of the same email must produce exactly one success.
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> StorageResult<i64>;
}

/// Point lookups on accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Fails with `StorageError::UserNotFound` when no account has this email.
    async fn user(&self, email: &str) -> StorageResult<User>;

    /// Fails with `StorageError::UserNotFound` when no account has this id.
    async fn is_admin(&self, user_id: i64) -> StorageResult<bool>;
}

/// Point lookups on applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// Fails with `StorageError::AppNotFound` when no application has this id.
    async fn app(&self, app_id: i32) -> StorageResult<App>;
}
