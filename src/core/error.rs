//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors detected when a search request is validated, before any traversal
/// begins.
///
/// Once a session is running there are no fatal errors: unreadable
/// directories and files are tolerated inside the walker, and cancellation
/// is a normal outcome rather than an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The requested root does not exist or is not a directory.
    #[error("Path is not a valid directory: {0}")]
    InvalidRoot(PathBuf),

    /// The search keyword is empty.
    #[error("Search keyword must not be empty")]
    EmptyKeyword,
}
