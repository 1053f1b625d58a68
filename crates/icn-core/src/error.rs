//! Error types for the ICN packet model

use thiserror::Error;

/// Errors raised while parsing or interpreting names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Invalid name URI: {0}")]
    InvalidUri(String),

    #[error("Invalid percent-escape in component: {0}")]
    InvalidEscape(String),

    #[error("Component is not a sequence number: {0}")]
    NotASequenceNumber(String),
}
