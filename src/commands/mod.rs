//! User actions. Each returns a user-facing message on failure.

pub mod document;
pub mod evaluation;
pub mod settings;
pub mod summary;
