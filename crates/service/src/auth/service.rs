use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::task;
use tracing::{error, info, instrument, warn, Instrument};

use super::domain::{LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password::PasswordHasher;
use super::repository::{AppProvider, StorageError, UserProvider, UserSaver};
use super::token;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_ttl: Duration,
    pub hasher: PasswordHasher,
}

impl AuthConfig {
    pub fn new(token_ttl: Duration) -> Self {
        Self { token_ttl, hasher: PasswordHasher::new() }
    }
}

/// Auth business service independent of transport and storage technology.
///
/// Holds only immutable, shared dependencies; wrap it in an `Arc` and call it
/// from as many request handlers as needed.
pub struct AuthService {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    cfg: AuthConfig,
}

fn internal(context: &str, err: impl Display) -> AuthError {
    error!(kind = "internal", error = %err, "{}", context);
    AuthError::Internal(format!("{context}: {err}"))
}

impl AuthService {
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        cfg: AuthConfig,
    ) -> Self {
        Self { user_saver, user_provider, app_provider, cfg }
    }

    /// Build from one backend that provides all three storage capabilities.
    pub fn with_storage<S>(storage: Arc<S>, cfg: AuthConfig) -> Self
    where
        S: UserSaver + UserProvider + AppProvider + 'static,
    {
        Self::new(storage.clone(), storage.clone(), storage, cfg)
    }

    pub fn token_ttl(&self) -> Duration {
        self.cfg.token_ttl
    }

    /// Check credentials and issue a session token for the requested app.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, repository::mock::MockStorage};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use std::{sync::Arc, time::Duration};
    /// let storage = Arc::new(MockStorage::new().with_app(1, "web", "web-secret"));
    /// let svc = AuthService::with_storage(storage, AuthConfig::new(Duration::from_secs(3600)));
    /// tokio_test::block_on(svc.register_new_user(RegisterInput::new("u@e.com", "Passw0rd"))).unwrap();
    /// let token = tokio_test::block_on(svc.login(LoginInput::new("u@e.com", "Passw0rd", 1))).unwrap();
    /// assert!(!token.is_empty());
    /// ```
    #[instrument(skip_all, fields(op = "auth.login", email = %input.email, app_id = input.app_id))]
    pub async fn login(&self, input: LoginInput) -> Result<String, AuthError> {
        info!("attempting to log in");
        let LoginInput { email, password, app_id } = input;

        let user = match self.user_provider.user(&email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                warn!(kind = AuthError::InvalidCredentials.kind(), "user not found");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(internal("failed to get user", e)),
        };

        let hasher = self.cfg.hasher.clone();
        let pass_hash = user.pass_hash.clone();
        let matched = task::spawn_blocking(move || hasher.verify_password(password.expose_secret(), &pass_hash))
            .await
            .map_err(|e| internal("password verification task failed", e))?;
        if !matched {
            info!(kind = AuthError::InvalidCredentials.kind(), "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let app = match self.app_provider.app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                warn!(kind = AuthError::InvalidAppId.kind(), "app not found");
                return Err(AuthError::InvalidAppId);
            }
            Err(e) => return Err(internal("failed to get app", e)),
        };

        let token = token::new_token(&app, &user, self.cfg.token_ttl)
            .map_err(|e| internal("failed to generate token", e))?;

        info!(user_id = user.id, "user logged in successfully");
        Ok(token)
    }

    /// Register a new user and return the id assigned by storage.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthError, AuthService, repository::mock::MockStorage};
    /// use service::auth::domain::RegisterInput;
    /// use std::{sync::Arc, time::Duration};
    /// let svc = AuthService::with_storage(Arc::new(MockStorage::new()), AuthConfig::new(Duration::from_secs(60)));
    /// let id = tokio_test::block_on(svc.register_new_user(RegisterInput::new("user@example.com", "Secret123"))).unwrap();
    /// assert_eq!(id, 1);
    /// let again = tokio_test::block_on(svc.register_new_user(RegisterInput::new("user@example.com", "Other456")));
    /// assert_eq!(again, Err(AuthError::UserAlreadyExists));
    /// ```
    #[instrument(skip_all, fields(op = "auth.register_new_user", email = %input.email))]
    pub async fn register_new_user(&self, input: RegisterInput) -> Result<i64, AuthError> {
        info!("registering user");
        let RegisterInput { email, password } = input;

        let hasher = self.cfg.hasher.clone();
        let pass_hash = task::spawn_blocking(move || hasher.hash_password(password.expose_secret()))
            .await
            .map_err(|e| internal("password hashing task failed", e))?
            .map_err(|e| internal("failed to generate password hash", e))?;

        // Runs detached: if our caller goes away the insert still finishes.
        let saver = Arc::clone(&self.user_saver);
        let save = tokio::spawn(
            async move { saver.save_user(&email, &pass_hash).await }.in_current_span(),
        );

        match save.await.map_err(|e| internal("save user task failed", e))? {
            Ok(id) => {
                info!(user_id = id, "user registered");
                Ok(id)
            }
            Err(StorageError::UserExists) => {
                warn!(kind = AuthError::UserAlreadyExists.kind(), "user already exists");
                Err(AuthError::UserAlreadyExists)
            }
            Err(e) => Err(internal("failed to save user", e)),
        }
    }

    /// Report whether the user holds the admin flag.
    #[instrument(skip(self), fields(op = "auth.is_admin"))]
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AuthError> {
        info!("checking if user is admin");

        match self.user_provider.is_admin(user_id).await {
            Ok(is_admin) => {
                info!(is_admin, "checked if user is admin");
                Ok(is_admin)
            }
            Err(StorageError::UserNotFound) => {
                warn!(kind = AuthError::NotFound.kind(), "user not found");
                Err(AuthError::NotFound)
            }
            Err(e) => Err(internal("failed to get admin flag", e)),
        }
    }
}
