/// PostgreSQL credential store
use super::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
use crate::config::DatabaseSettings;
use crate::models::{App, User};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

/// sqlx-backed store implementing every credential capability.
///
/// Email uniqueness is enforced by the `users.email` UNIQUE constraint, so
/// concurrent registrations of the same address race inside Postgres and
/// exactly one insert wins.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool using the configured limits.
    pub async fn connect(settings: &DatabaseSettings) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
            .connect(&settings.url)
            .await?;

        info!(
            max_connections = settings.max_connections,
            "Database pool initialized"
        );

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl UserSaver for PgStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (email, pass_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(pass_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for PgStorage {
    async fn user(&self, email: &str) -> StorageResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, pass_hash, is_admin FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> StorageResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for PgStorage {
    async fn app(&self, app_id: i32) -> StorageResult<App> {
        sqlx::query_as::<_, App>("SELECT id, name, secret FROM apps WHERE id = $1")
            .bind(app_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::AppNotFound)
    }
}

/// Translate a unique-constraint violation into the "already exists" signal.
fn map_insert_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::UserExists;
        }
    }

    StorageError::Database(err)
}
