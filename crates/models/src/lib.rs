//! SeaORM entities backing the identity store: `users` and `apps`.

pub mod errors;
pub mod db;
pub mod user;
pub mod app;
