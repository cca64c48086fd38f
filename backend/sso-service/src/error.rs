use crate::security::{PasswordError, TokenError};
use crate::storage::StorageError;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, AuthError>;

/// Message every auth failure carries on the wire.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Failures of the auth core.
///
/// `InvalidCredentials` covers both an unknown email and a wrong password so
/// callers cannot probe which emails are registered.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user exists")]
    UserExists,

    #[error("invalid app id")]
    InvalidAppId,

    #[error("user not found")]
    UserNotFound,

    #[error("token generation failed: {0}")]
    TokenGenerationFailed(#[from] TokenError),

    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{op}: {source}")]
    PasswordHash {
        op: &'static str,
        #[source]
        source: PasswordError,
    },
}

impl AuthError {
    pub fn storage(op: &'static str, source: StorageError) -> Self {
        AuthError::Storage { op, source }
    }

    pub fn password_hash(op: &'static str, source: PasswordError) -> Self {
        AuthError::PasswordHash { op, source }
    }

    /// Wire code for each error kind.
    ///
    /// Every auth failure collapses to `INTERNAL`: the response must not tell
    /// a wrong password apart from an unknown email or a server fault.
    /// Client faults are reported by the request validator, never from here.
    pub fn code(&self) -> Code {
        match self {
            AuthError::InvalidCredentials => Code::Internal,
            AuthError::UserExists => Code::Internal,
            AuthError::InvalidAppId => Code::Internal,
            AuthError::UserNotFound => Code::Internal,
            AuthError::TokenGenerationFailed(_) => Code::Internal,
            AuthError::Storage { .. } => Code::Internal,
            AuthError::PasswordHash { .. } => Code::Internal,
        }
    }

    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        Status::new(self.code(), INTERNAL_ERROR_MESSAGE)
    }
}

// gRPC Status conversion
impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds() -> Vec<AuthError> {
        vec![
            AuthError::InvalidCredentials,
            AuthError::UserExists,
            AuthError::InvalidAppId,
            AuthError::UserNotFound,
            AuthError::TokenGenerationFailed(TokenError::InvalidTtl(
                std::time::Duration::from_secs(u64::MAX),
            )),
            AuthError::storage("auth.login", StorageError::Database(sqlx::Error::PoolTimedOut)),
            AuthError::password_hash("auth.register_new_user", PasswordError::Hash("boom".into())),
        ]
    }

    #[test]
    fn test_every_kind_maps_to_internal() {
        for err in all_kinds() {
            let status = err.to_status();
            assert_eq!(status.code(), Code::Internal, "{err} must map to INTERNAL");
            assert_eq!(status.message(), INTERNAL_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_wire_message_hides_kind() {
        let wrong_password = Status::from(AuthError::InvalidCredentials);
        let server_fault = Status::from(AuthError::storage(
            "auth.login",
            StorageError::Database(sqlx::Error::PoolTimedOut),
        ));

        assert_eq!(wrong_password.code(), server_fault.code());
        assert_eq!(wrong_password.message(), server_fault.message());
    }

    #[test]
    fn test_storage_error_display_carries_op() {
        let err = AuthError::storage("auth.is_admin", StorageError::AppNotFound);
        assert_eq!(err.to_string(), "auth.is_admin: app not found");
    }
}
