use async_trait::async_trait;
use thiserror::Error;

use super::domain::{App, User};

/// Conditions a storage backend reports to the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("app not found")]
    AppNotFound,
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Creates users. The email uniqueness check and the insert must be one atomic step.
#[async_trait]
pub trait UserSaver: Send + Sync {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError>;
}

/// Reads users.
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn user(&self, email: &str) -> Result<User, StorageError>;
    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError>;
}

/// Reads apps.
#[async_trait]
pub trait AppProvider: Send + Sync {
    async fn app(&self, app_id: i32) -> Result<App, StorageError>;
}

/// Simple in-memory storage for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Default)]
    struct State {
        users: HashMap<String, User>, // key: email
        apps: HashMap<i32, App>,
        last_id: i64,
    }

    #[derive(Default)]
    pub struct MockStorage {
        state: Mutex<State>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builder-style registration of an app.
        pub fn with_app(mut self, id: i32, name: &str, secret: &str) -> Self {
            let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
            state.apps.insert(id, App::new(id, name, secret));
            self
        }

        pub fn insert_app(&self, app: App) -> Result<(), StorageError> {
            self.lock()?.apps.insert(app.id, app);
            Ok(())
        }

        pub fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StorageError> {
            let mut state = self.lock()?;
            let user = state
                .users
                .values_mut()
                .find(|u| u.id == user_id)
                .ok_or(StorageError::UserNotFound)?;
            user.is_admin = is_admin;
            Ok(())
        }

        pub fn user_count(&self) -> usize {
            self.state.lock().unwrap_or_else(PoisonError::into_inner).users.len()
        }

        fn lock(&self) -> Result<MutexGuard<'_, State>, StorageError> {
            self.state
                .lock()
                .map_err(|_| StorageError::Backend("mock storage lock poisoned".into()))
        }
    }

    #[async_trait]
    impl UserSaver for MockStorage {
        async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError> {
            let mut state = self.lock()?;
            if state.users.contains_key(email) {
                return Err(StorageError::UserExists);
            }
            state.last_id += 1;
            let id = state.last_id;
            let user = User { id, email: email.to_string(), pass_hash: pass_hash.to_string(), is_admin: false };
            state.users.insert(email.to_string(), user);
            Ok(id)
        }
    }

    #[async_trait]
    impl UserProvider for MockStorage {
        async fn user(&self, email: &str) -> Result<User, StorageError> {
            self.lock()?.users.get(email).cloned().ok_or(StorageError::UserNotFound)
        }

        async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
            self.lock()?
                .users
                .values()
                .find(|u| u.id == user_id)
                .map(|u| u.is_admin)
                .ok_or(StorageError::UserNotFound)
        }
    }

    #[async_trait]
    impl AppProvider for MockStorage {
        async fn app(&self, app_id: i32) -> Result<App, StorageError> {
            self.lock()?.apps.get(&app_id).cloned().ok_or(StorageError::AppNotFound)
        }
    }

}
