//! Identity core of the SSO backend.
//! - Verifies credentials, issues per-app session tokens, registers users.
//! - Depends on storage only through the narrow traits in [`auth::repository`].
//! - Classifies every failure into [`auth::errors::AuthError`] before returning.

pub mod auth;
#[cfg(test)]
pub mod test_support;
