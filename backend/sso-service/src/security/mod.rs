/// Security primitives for sso-service
///
/// - **password**: Argon2id password hashing
/// - **jwt**: application-scoped session token issuing (HS256)
pub mod jwt;
pub mod password;

pub use jwt::{new_token, verify_token, Claims, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
