//! Shared building blocks for the SSO workspace: logging setup, runtime
//! environment checks and small DTOs used by more than one crate.

pub mod env;
pub mod types;
pub mod utils;
