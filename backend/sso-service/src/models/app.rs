use sqlx::FromRow;
use std::fmt;

/// Application a session token is issued for.
///
/// Provisioned out of band; `secret` is the HMAC key tokens for this app are
/// signed with.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: Vec<u8>,
}

impl App {
    pub fn new(id: i32, name: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}
