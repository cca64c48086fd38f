/// Session token issuing
///
/// Tokens are HS256 JWTs signed with the secret of the application they are
/// issued for, so only holders of that secret can verify them. There is no
/// refresh and no revocation: `exp` is the only way a token stops being valid.
///
/// ## Claims
///
/// - `uid`: user id
/// - `email`: user email
/// - `app_id`: application the token is scoped to
/// - `exp`: expiry as a Unix timestamp, always `issued_at + ttl`
use crate::models::{App, User};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,
    pub email: String,
    pub app_id: i32,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token ttl out of range: {0:?}")]
    InvalidTtl(Duration),

    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("token validation failed: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issue a token for `user` scoped to `app`, expiring `ttl` from now.
pub fn new_token(user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
    new_token_at(user, app, Utc::now(), ttl)
}

/// Issue a token as of `issued_at`.
pub fn new_token_at(
    user: &User,
    app: &App,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, TokenError> {
    let ttl_delta = chrono::Duration::from_std(ttl).map_err(|_| TokenError::InvalidTtl(ttl))?;
    let expires_at = issued_at
        .checked_add_signed(ttl_delta)
        .ok_or(TokenError::InvalidTtl(ttl))?;

    let claims = Claims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(&app.secret),
    )
    .map_err(TokenError::Sign)
}

/// Verify signature and expiry of a token issued for the app owning `secret`.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(TokenError::Invalid)
}
