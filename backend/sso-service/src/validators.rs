/// Request validation for the Auth RPCs
///
/// Structural checks only: presence of the required fields. Whether an
/// account exists or a password is right is decided by the auth service.
use thiserror::Error;
use tonic::{Code, Status};

/// Client-fault rejection of a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email is required")]
    EmailRequired,

    #[error("password is required")]
    PasswordRequired,

    #[error("app_id is required")]
    AppIdRequired,

    #[error("user_id is required")]
    UserIdRequired,
}

impl ValidationError {
    pub fn code(&self) -> Code {
        Code::InvalidArgument
    }
}

impl From<ValidationError> for Status {
    fn from(err: ValidationError) -> Self {
        Status::new(err.code(), err.to_string())
    }
}

pub fn validate_login(email: &str, password: &str, app_id: i32) -> Result<(), ValidationError> {
    validate_register(email, password)?;

    if app_id == 0 {
        return Err(ValidationError::AppIdRequired);
    }

    Ok(())
}

pub fn validate_register(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }

    Ok(())
}

pub fn validate_is_admin(user_id: i64) -> Result<(), ValidationError> {
    if user_id == 0 {
        return Err(ValidationError::UserIdRequired);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_login() {
        assert!(validate_login("user@example.com", "pass", 1).is_ok());
    }

    #[test]
    fn test_login_rejections() {
        assert_eq!(
            validate_login("", "pass", 1),
            Err(ValidationError::EmailRequired)
        );
        assert_eq!(
            validate_login("user@example.com", "", 1),
            Err(ValidationError::PasswordRequired)
        );
        assert_eq!(
            validate_login("user@example.com", "pass", 0),
            Err(ValidationError::AppIdRequired)
        );
    }

    #[test]
    fn test_register_rejections() {
        assert!(validate_register("user@example.com", "pass").is_ok());
        assert_eq!(
            validate_register("", "pass"),
            Err(ValidationError::EmailRequired)
        );
        assert_eq!(
            validate_register("user@example.com", ""),
            Err(ValidationError::PasswordRequired)
        );
    }

    #[test]
    fn test_is_admin_rejections() {
        assert!(validate_is_admin(5).is_ok());
        assert!(validate_is_admin(-5).is_ok());
        assert_eq!(validate_is_admin(0), Err(ValidationError::UserIdRequired));
    }

    #[test]
    fn test_status_is_invalid_argument() {
        let status = Status::from(ValidationError::AppIdRequired);
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "app_id is required");
    }
}
