//! Shared primitives for all Rust crates in Grantmap.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Grantmap crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn not_found_error_names_the_missing_resource() {
        let error = AppError::NotFound("permission mapper for context 'media'".to_owned());
        assert_eq!(
            error.to_string(),
            "not found: permission mapper for context 'media'"
        );
    }
}
