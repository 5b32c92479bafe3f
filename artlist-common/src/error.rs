//! Common error types for artlist

use thiserror::Error;

/// Common result type for artlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the store, the thumbnail generator and configuration
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Master list content could not be parsed
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Two master list records share the same id
    #[error("Duplicate artist id {0} in master list")]
    DuplicateId(u32),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No id left above the highest one in the master list
    #[error("No artist id available after {0}")]
    IdsExhausted(u32),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
