use thiserror::Error;

use super::password::PasswordError;
use super::token::TokenError;

/// Closed set of outcomes the auth core reports to its callers.
///
/// Unknown email and wrong password are both [`AuthError::InvalidCredentials`]
/// so callers cannot probe which emails are registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid app id")]
    InvalidAppId,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 1001,
            AuthError::InvalidAppId => 1002,
            AuthError::UserAlreadyExists => 1003,
            AuthError::NotFound => 1004,
            AuthError::Internal(_) => 1005,
        }
    }

    /// Short label used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidAppId => "invalid_app_id",
            AuthError::UserAlreadyExists => "user_already_exists",
            AuthError::NotFound => "not_found",
            AuthError::Internal(_) => "internal",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Internal(_))
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("task failed: {err}"))
    }
}
