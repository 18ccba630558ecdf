//! Cross-cutting error types for railshift.
//!
//! Transport, configuration, and storage errors live in their own crates
//! (`ApiError`, `ConfigError`, `StoreError`). They converge in `rail-cli`
//! through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any railshift crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An entity name did not match any known kind.
    #[error("Unknown entity kind: {0}")]
    UnknownEntity(String),

    /// Data failed validation (shape, required fields).
    #[error("Validation error: {0}")]
    Validation(String),
}
