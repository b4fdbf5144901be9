//! Error taxonomy for mender.
//!
//! Every public operation returns a tagged [`Error`] instead of raising past
//! its boundary; the interactive loop prints the failure and continues.

use thiserror::Error;

/// Failure kinds surfaced to the interactive loop and CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// A file or function could not be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Original or replacement source failed to parse.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A completion provider returned a non-200 status or a malformed body.
    #[error("provider error: {0}")]
    Provider(String),

    /// A bounded operation exceeded its budget.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Filesystem read or write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
