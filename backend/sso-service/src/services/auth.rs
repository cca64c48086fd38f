/// Auth service - credential verification, registration and admin lookup
///
/// Orchestrates the credential store capabilities and the token issuer. The
/// service holds no mutable state: store handles and the token TTL are fixed
/// at construction and shared by every request.
use crate::error::{AuthError, Result};
use crate::security::jwt;
use crate::security::password::{hash_password_blocking, verify_password_blocking};
use crate::storage::{AppProvider, StorageError, UserProvider, UserSaver};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Operations exposed to the transport layer.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify credentials and issue a session token for `app_id`.
    async fn login(&self, email: &str, password: &str, app_id: i32) -> Result<String>;

    /// Create an account and return its id.
    async fn register_new_user(&self, email: &str, password: &str) -> Result<i64>;

    async fn is_admin(&self, user_id: i64) -> Result<bool>;
}

/// Everything `AuthService` needs, passed in explicitly.
#[derive(Clone)]
pub struct AuthServiceConfig {
    pub user_saver: Arc<dyn UserSaver>,
    pub user_provider: Arc<dyn UserProvider>,
    pub app_provider: Arc<dyn AppProvider>,
    pub token_ttl: Duration,
}

impl AuthServiceConfig {
    /// Use one store for all three capabilities.
    pub fn from_store<S>(store: Arc<S>, token_ttl: Duration) -> Self
    where
        S: UserSaver + UserProvider + AppProvider + 'static,
    {
        Self {
            user_saver: store.clone(),
            user_provider: store.clone(),
            app_provider: store,
            token_ttl,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: AuthServiceConfig) -> Self {
        Self {
            user_saver: config.user_saver,
            user_provider: config.user_provider,
            app_provider: config.app_provider,
            token_ttl: config.token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Login flow:
    ///
    /// 1. Look up the user by email; a miss is `InvalidCredentials`
    /// 2. Verify the password hash; a mismatch is also `InvalidCredentials`
    /// 3. Look up the application; a miss is `InvalidAppId`
    /// 4. Sign a token with the application's secret
    #[instrument(name = "auth.login", skip(self, password), fields(op = "auth.login"))]
    pub async fn login(&self, email: &str, password: &str, app_id: i32) -> Result<String> {
        const OP: &str = "auth.login";

        info!("attempting to login user");

        let user = match self.user_provider.user(email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                warn!("user not found");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                error!(error = %err, "failed to get user");
                return Err(AuthError::storage(OP, err));
            }
        };

        let password_matches =
            verify_password_blocking(password.to_string(), user.pass_hash.clone())
                .await
                .map_err(|err| {
                    error!(error = %err, user_id = user.id, "failed to verify password");
                    AuthError::password_hash(OP, err)
                })?;

        if !password_matches {
            info!(user_id = user.id, "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let app = match self.app_provider.app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                warn!("app not found");
                return Err(AuthError::InvalidAppId);
            }
            Err(err) => {
                error!(error = %err, "failed to get app");
                return Err(AuthError::storage(OP, err));
            }
        };

        info!(user_id = user.id, "user logged in successfully");

        let token = jwt::new_token(&user, &app, self.token_ttl).map_err(|err| {
            error!(error = %err, "failed to generate token");
            AuthError::TokenGenerationFailed(err)
        })?;

        Ok(token)
    }

    /// Hash the password and persist a new account.
    ///
    /// The only state-mutating operation; uniqueness of the email is left to
    /// the store.
    #[instrument(
        name = "auth.register_new_user",
        skip(self, password),
        fields(op = "auth.register_new_user")
    )]
    pub async fn register_new_user(&self, email: &str, password: &str) -> Result<i64> {
        const OP: &str = "auth.register_new_user";

        info!("registering user");

        let pass_hash = hash_password_blocking(password.to_string())
            .await
            .map_err(|err| {
                error!(error = %err, "failed to generate password hash");
                AuthError::password_hash(OP, err)
            })?;

        let user_id = match self.user_saver.save_user(email, &pass_hash).await {
            Ok(user_id) => user_id,
            Err(StorageError::UserExists) => {
                warn!("user already exists");
                return Err(AuthError::UserExists);
            }
            Err(err) => {
                error!(error = %err, "failed to save user");
                return Err(AuthError::storage(OP, err));
            }
        };

        info!(user_id, "user registered");

        Ok(user_id)
    }

    #[instrument(name = "auth.is_admin", skip(self), fields(op = "auth.is_admin"))]
    pub async fn is_admin(&self, user_id: i64) -> Result<bool> {
        const OP: &str = "auth.is_admin";

        info!("checking if user is admin");

        let is_admin = match self.user_provider.is_admin(user_id).await {
            Ok(is_admin) => is_admin,
            Err(StorageError::UserNotFound) => {
                warn!("user not found");
                return Err(AuthError::UserNotFound);
            }
            Err(err) => {
                error!(error = %err, "failed to check admin flag");
                return Err(AuthError::storage(OP, err));
            }
        };

        info!(is_admin, "admin check completed");

        Ok(is_admin)
    }
}

#[async_trait]
impl Authenticator for AuthService {
    async fn login(&self, email: &str, password: &str, app_id: i32) -> Result<String> {
        AuthService::login(self, email, password, app_id).await
    }

    async fn register_new_user(&self, email: &str, password: &str) -> Result<i64> {
        AuthService::register_new_user(self, email, password).await
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool> {
        AuthService::is_admin(self, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{App, User};
    use crate::security::{hash_password, verify_token};
    use crate::storage::{MockAppProvider, MockUserProvider, MockUserSaver};
    use chrono::Utc;

    const EMAIL: &str = "user@example.com";
    const PASSWORD: &str = "correct-horse";
    const APP_ID: i32 = 1;
    const APP_SECRET: &str = "secret-sample";
    const TTL: Duration = Duration::from_secs(3600);

    fn service(
        saver: MockUserSaver,
        provider: MockUserProvider,
        apps: MockAppProvider,
    ) -> AuthService {
        AuthService::new(AuthServiceConfig {
            user_saver: Arc::new(saver),
            user_provider: Arc::new(provider),
            app_provider: Arc::new(apps),
            token_ttl: TTL,
        })
    }

    fn stored_user() -> User {
        User {
            id: 17,
            email: EMAIL.to_string(),
            pass_hash: hash_password(PASSWORD).expect("should hash"),
            is_admin: false,
        }
    }

    fn provider_returning(user: User) -> MockUserProvider {
        let mut provider = MockUserProvider::new();
        provider
            .expect_user()
            .withf(|email| email == EMAIL)
            .times(1)
            .returning(move |_| Ok(user.clone()));
        provider
    }

    fn apps_returning_test_app() -> MockAppProvider {
        let mut apps = MockAppProvider::new();
        apps.expect_app()
            .withf(|app_id| *app_id == APP_ID)
            .times(1)
            .returning(|id| Ok(App::new(id, "test", APP_SECRET)));
        apps
    }

    // ========================================================================
    // Login
    // ========================================================================

    #[tokio::test]
    async fn test_login_issues_scoped_token() {
        let auth = service(
            MockUserSaver::new(),
            provider_returning(stored_user()),
            apps_returning_test_app(),
        );

        let login_time = Utc::now();
        let token = auth.login(EMAIL, PASSWORD, APP_ID).await.unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, APP_SECRET.as_bytes()).unwrap();
        assert_eq!(claims.uid, 17);
        assert_eq!(claims.email, EMAIL);
        assert_eq!(claims.app_id, APP_ID);
        let expected_exp = login_time.timestamp() + TTL.as_secs() as i64;
        assert!((claims.exp - expected_exp).abs() <= 3);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut provider = MockUserProvider::new();
        provider
            .expect_user()
            .times(1)
            .returning(|_| Err(StorageError::UserNotFound));
        // No app lookup may happen.
        let auth = service(MockUserSaver::new(), provider, MockAppProvider::new());

        let result = auth.login("ghost@example.com", PASSWORD, APP_ID).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let auth = service(
            MockUserSaver::new(),
            provider_returning(stored_user()),
            MockAppProvider::new(),
        );

        let result = auth.login(EMAIL, "wrong-password", APP_ID).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_app_is_distinct_from_bad_credentials() {
        let mut apps = MockAppProvider::new();
        apps.expect_app()
            .times(1)
            .returning(|_| Err(StorageError::AppNotFound));
        let auth = service(MockUserSaver::new(), provider_returning(stored_user()), apps);

        let result = auth.login(EMAIL, PASSWORD, 999).await;

        assert!(matches!(result, Err(AuthError::InvalidAppId)));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_wrapped_with_op() {
        let mut provider = MockUserProvider::new();
        provider
            .expect_user()
            .times(1)
            .returning(|_| Err(StorageError::Database(sqlx::Error::PoolTimedOut)));
        let auth = service(MockUserSaver::new(), provider, MockAppProvider::new());

        let result = auth.login(EMAIL, PASSWORD, APP_ID).await;

        match result {
            Err(AuthError::Storage { op, source }) => {
                assert_eq!(op, "auth.login");
                assert!(matches!(
                    source,
                    StorageError::Database(sqlx::Error::PoolTimedOut)
                ));
            }
            other => panic!("expected wrapped storage error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_corrupt_hash_is_not_invalid_credentials() {
        let mut user = stored_user();
        user.pass_hash = b"garbage".to_vec();
        let auth = service(
            MockUserSaver::new(),
            provider_returning(user),
            MockAppProvider::new(),
        );

        let result = auth.login(EMAIL, PASSWORD, APP_ID).await;

        assert!(matches!(
            result,
            Err(AuthError::PasswordHash { op: "auth.login", .. })
        ));
    }

    // ========================================================================
    // Registration
    // ========================================================================

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut saver = MockUserSaver::new();
        saver
            .expect_save_user()
            .withf(|email, hash| email == EMAIL && hash != PASSWORD.as_bytes())
            .times(1)
            .returning(|_, _| Ok(5));
        let auth = service(saver, MockUserProvider::new(), MockAppProvider::new());

        let user_id = auth.register_new_user(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(user_id, 5);
    }

    #[tokio::test]
    async fn test_register_duplicate_is_user_exists() {
        let mut saver = MockUserSaver::new();
        saver
            .expect_save_user()
            .times(1)
            .returning(|_, _| Err(StorageError::UserExists));
        let auth = service(saver, MockUserProvider::new(), MockAppProvider::new());

        let result = auth.register_new_user(EMAIL, PASSWORD).await;

        assert!(matches!(result, Err(AuthError::UserExists)));
    }

    #[tokio::test]
    async fn test_register_save_failure_is_propagated() {
        let mut saver = MockUserSaver::new();
        saver
            .expect_save_user()
            .times(1)
            .returning(|_, _| Err(StorageError::Database(sqlx::Error::PoolClosed)));
        let auth = service(saver, MockUserProvider::new(), MockAppProvider::new());

        let result = auth.register_new_user(EMAIL, PASSWORD).await;

        assert!(matches!(
            result,
            Err(AuthError::Storage {
                op: "auth.register_new_user",
                ..
            })
        ));
    }

    // ========================================================================
    // Admin check
    // ========================================================================

    #[tokio::test]
    async fn test_is_admin_returns_flag() {
        let mut provider = MockUserProvider::new();
        provider
            .expect_is_admin()
            .withf(|user_id| *user_id == 3)
            .times(1)
            .returning(|_| Ok(true));
        let auth = service(MockUserSaver::new(), provider, MockAppProvider::new());

        assert!(auth.is_admin(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_admin_missing_user_is_user_not_found() {
        let mut provider = MockUserProvider::new();
        provider
            .expect_is_admin()
            .times(1)
            .returning(|_| Err(StorageError::UserNotFound));
        let auth = service(MockUserSaver::new(), provider, MockAppProvider::new());

        let result = auth.is_admin(404).await;

        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_is_admin_store_failure_is_wrapped() {
        let mut provider = MockUserProvider::new();
        provider
            .expect_is_admin()
            .times(1)
            .returning(|_| Err(StorageError::Database(sqlx::Error::PoolTimedOut)));
        let auth = service(MockUserSaver::new(), provider, MockAppProvider::new());

        let result = auth.is_admin(3).await;

        assert!(matches!(
            result,
            Err(AuthError::Storage {
                op: "auth.is_admin",
                ..
            })
        ));
    }
}
