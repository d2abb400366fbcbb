//! Error types for color parsing and catalog search.

use thiserror::Error;

/// Errors returned by the matching engine.
///
/// Every variant is a caller-correctable input problem; retrying the same
/// call with the same input will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Input is not `#` followed by exactly six hex digits
    #[error("Invalid color format: {input:?} (expected #RRGGBB)")]
    InvalidColorFormat {
        /// The rejected input, verbatim
        input: String,
    },

    /// A top-K search was requested with `k == 0`
    #[error("Invalid top-k: k must be at least 1")]
    InvalidTopK,
}

impl MatchError {
    /// Create an invalid color format error for the given input.
    pub fn invalid_color(input: impl Into<String>) -> Self {
        Self::InvalidColorFormat {
            input: input.into(),
        }
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, MatchError>;
