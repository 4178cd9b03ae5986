//! Storage backends for the auth port.
pub mod seaorm;
