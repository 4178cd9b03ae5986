use std::fmt;

use secrecy::SecretString;

/// Registered user as the core sees it.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string; opaque outside [`super::password`].
    pub pass_hash: String,
    pub is_admin: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// Client application allowed to request tokens. Read-only to the core.
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: i32,
    pub name: String,
    /// HMAC key for tokens issued to this app.
    pub secret: Vec<u8>,
}

impl App {
    pub fn new(id: i32, name: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self { id, name: name.into(), secret: secret.into() }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Login input
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: SecretString,
    pub app_id: i32,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>, app_id: i32) -> Self {
        Self { email: email.into(), password: SecretString::from(password.into()), app_id }
    }
}

/// Registration input
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: SecretString,
}

impl RegisterInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: SecretString::from(password.into()) }
    }
}
