use async_trait::async_trait;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::auth::domain::{App, User};
use crate::auth::repository::{AppProvider, StorageError, UserProvider, UserSaver};

/// Relational storage over SeaORM (sqlite or postgres).
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: ModelError) -> StorageError {
    StorageError::Backend(err.to_string())
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        User { id: m.id, email: m.email, pass_hash: m.pass_hash, is_admin: m.is_admin }
    }
}

impl From<models::app::Model> for App {
    fn from(m: models::app::Model) -> Self {
        App { id: m.id, name: m.name, secret: m.secret.into_bytes() }
    }
}

#[async_trait]
impl UserSaver for SeaOrmStorage {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError> {
        match models::user::create(&self.db, email, pass_hash).await {
            Ok(created) => Ok(created.id),
            Err(ModelError::Conflict(_)) => Err(StorageError::UserExists),
            Err(e) => Err(backend(e)),
        }
    }
}

#[async_trait]
impl UserProvider for SeaOrmStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        models::user::find_by_email(&self.db, email)
            .await
            .map_err(backend)?
            .map(User::from)
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        models::user::find_by_id(&self.db, user_id)
            .await
            .map_err(backend)?
            .map(|u| u.is_admin)
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for SeaOrmStorage {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        models::app::find_by_id(&self.db, app_id)
            .await
            .map_err(backend)?
            .map(App::from)
            .ok_or(StorageError::AppNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, RegisterInput};
    use crate::auth::password::PasswordHasher;
    use crate::auth::{AuthConfig, AuthError, AuthService};
    use crate::test_support::memory_db;
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn save_and_lookup_user() -> anyhow::Result<()> {
        let storage = SeaOrmStorage::new(memory_db().await?);

        let id = storage.save_user("alice@example.com", "$argon2id$h").await?;
        let user = storage.user("alice@example.com").await?;
        assert_eq!(user.id, id);
        assert_eq!(user.pass_hash, "$argon2id$h");
        assert!(!storage.is_admin(id).await?);

        models::user::set_admin(&storage.db, id, true).await?;
        assert!(storage.is_admin(id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_user_exists() -> anyhow::Result<()> {
        let storage = SeaOrmStorage::new(memory_db().await?);

        let first = storage.save_user("bob@example.com", "h1").await?;
        let err = storage.save_user("bob@example.com", "h2").await.unwrap_err();
        assert_eq!(err, StorageError::UserExists);

        let kept = storage.user("bob@example.com").await?;
        assert_eq!((kept.id, kept.pass_hash.as_str()), (first, "h1"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() -> anyhow::Result<()> {
        let storage = SeaOrmStorage::new(memory_db().await?);
        assert_eq!(storage.user("ghost@example.com").await.unwrap_err(), StorageError::UserNotFound);
        assert_eq!(storage.is_admin(77).await.unwrap_err(), StorageError::UserNotFound);
        assert_eq!(storage.app(5).await.unwrap_err(), StorageError::AppNotFound);
        Ok(())
    }

    #[tokio::test]
    async fn app_secret_comes_back_as_bytes() -> anyhow::Result<()> {
        let storage = SeaOrmStorage::new(memory_db().await?);
        models::app::upsert(&storage.db, 1, "web", "web-secret").await?;

        let app = storage.app(1).await?;
        assert_eq!(app.name, "web");
        assert_eq!(app.secret, b"web-secret".to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn broken_schema_is_backend_error() -> anyhow::Result<()> {
        let storage = SeaOrmStorage::new(memory_db().await?);
        storage.db.execute_unprepared("DROP TABLE users").await?;

        let err = storage.user("alice@example.com").await.unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn service_flow_over_database() -> anyhow::Result<()> {
        let storage = Arc::new(SeaOrmStorage::new(memory_db().await?));
        models::app::upsert(&storage.db, 1, "web", "web-secret").await?;
        let cfg = AuthConfig { token_ttl: Duration::from_secs(60), hasher: PasswordHasher::with_cost(8, 1, 1)? };
        let svc = AuthService::with_storage(Arc::clone(&storage), cfg);

        let uid = svc.register_new_user(RegisterInput::new("carol@example.com", "pw")).await?;
        assert_eq!(
            svc.register_new_user(RegisterInput::new("carol@example.com", "pw")).await,
            Err(AuthError::UserAlreadyExists)
        );

        let token = svc.login(LoginInput::new("carol@example.com", "pw", 1)).await?;
        let claims = crate::auth::token::verify_token(&token, b"web-secret")?;
        assert_eq!(claims.uid, uid);
        assert!(!svc.is_admin(uid).await?);
        Ok(())
    }
}
