//! Error types for rs-readability.
//!
//! This module defines the error types returned by extraction operations.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input HTML was empty, so there is no document to work on.
    #[error("No document provided for parsing")]
    NoDocument,

    /// The document exceeded the configured element budget.
    #[error("Aborting parsing document; {0} elements found")]
    TooManyElements(usize),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
