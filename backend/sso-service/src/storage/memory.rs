/// In-process credential store
use super::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
use crate::models::{App, User};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// DashMap-backed store implementing every credential capability.
///
/// Users are keyed by email; the entry API holds the shard lock for the
/// check-and-insert, so duplicate emails cannot slip in under concurrency.
#[derive(Debug)]
pub struct InMemoryStorage {
    users: DashMap<String, User>,
    emails_by_id: DashMap<i64, String>,
    apps: DashMap<i32, App>,
    next_user_id: AtomicI64,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self {
            users: DashMap::new(),
            emails_by_id: DashMap::new(),
            apps: DashMap::new(),
            next_user_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an application (replaces any app with the same id).
    pub fn add_app(&self, app: App) {
        self.apps.insert(app.id, app);
    }

    /// Flip the admin flag out of band.
    pub fn set_admin(&self, user_id: i64, is_admin: bool) -> StorageResult<()> {
        let email = self
            .emails_by_id
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::UserNotFound)?;

        let mut user = self
            .users
            .get_mut(&email)
            .ok_or(StorageError::UserNotFound)?;
        user.is_admin = is_admin;

        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserSaver for InMemoryStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> StorageResult<i64> {
        match self.users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StorageError::UserExists),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::Relaxed);
                slot.insert(User {
                    id,
                    email: email.to_string(),
                    pass_hash: pass_hash.to_vec(),
                    is_admin: false,
                });
                self.emails_by_id.insert(id, email.to_string());
                Ok(id)
            }
        }
    }
}

#[async_trait]
impl UserProvider for InMemoryStorage {
    async fn user(&self, email: &str) -> StorageResult<User> {
        self.users
            .get(email)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> StorageResult<bool> {
        let email = self
            .emails_by_id
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::UserNotFound)?;

        self.users
            .get(&email)
            .map(|entry| entry.is_admin)
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for InMemoryStorage {
    async fn app(&self, app_id: i32) -> StorageResult<App> {
        self.apps
            .get(&app_id)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::AppNotFound)
    }
}
