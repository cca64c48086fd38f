use sqlx::FromRow;
use std::fmt;

/// User model - a registered account
///
/// `pass_hash` holds the PHC-encoded Argon2id hash, never the plaintext.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: Vec<u8>,
    pub is_admin: bool,
}

// Hand-written so the hash never ends up in logs through `{:?}`.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("pass_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}
