//! Shared primitives for all Rust crates in Turnstile.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Turnstile crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

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

    /// A coordination lock could not be acquired in time. Safe to retry.
    #[error("lock unavailable: {0}")]
    LockUnavailable(String),

    /// Internal unexpected error, including storage and connectivity faults.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the caller may retry the same operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockUnavailable(_))
    }
}
