/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid password hash format: {0}")]
    InvalidHash(String),

    #[error("password verification failed: {0}")]
    Verify(String),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password using Argon2id algorithm
///
/// ## Security
///
/// - Algorithm: Argon2id (default cost parameters)
/// - Salt: Random 16-byte salt generated per password
///
/// ## Returns
///
/// PHC-formatted hash as bytes, safe for database storage
pub fn hash_password(password: &str) -> Result<Vec<u8>, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(password_hash.into_bytes())
}

/// Verify a password against its stored hash
///
/// Returns `Ok(false)` on a mismatch; `Err` only when the stored hash is
/// unreadable or verification itself breaks.
pub fn verify_password(password: &str, password_hash: &[u8]) -> Result<bool, PasswordError> {
    let encoded = std::str::from_utf8(password_hash)
        .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    let parsed_hash =
        PasswordHash::new(encoded).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Run `hash_password` on the blocking pool.
///
/// The computation is not interruptible; dropping the returned future only
/// discards its result.
pub async fn hash_password_blocking(password: String) -> Result<Vec<u8>, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Run `verify_password` on the blocking pool.
pub async fn verify_password_blocking(
    password: String,
    password_hash: Vec<u8>,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await?
}
