//! Auth module: domain types, storage port, credential verifier, token issuer
//! and the service composing them.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use errors::AuthError;
pub use service::{AuthConfig, AuthService};
