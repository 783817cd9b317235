//! The search engine core: shared types, match classification, and the
//! directory walker that drives a single search session.

pub mod error;
pub mod matcher;
pub mod sink;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use self::error::SearchError;

/// A validated request to search a directory tree for a keyword.
///
/// The root must be an existing directory and the keyword must be non-empty;
/// both are checked once when the search starts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub root: PathBuf,
    pub keyword: String,
}

impl SearchRequest {
    pub fn new(root: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            keyword: keyword.into(),
        }
    }

    /// Checks the request invariants before any traversal begins.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }
        if !self.root.is_dir() {
            return Err(SearchError::InvalidRoot(self.root.clone()));
        }
        Ok(())
    }
}

/// How a file matched the keyword.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// The filename contains the keyword.
    Name,
    /// A line of the file's content contains the keyword.
    Content,
}

/// A single matching file. Exactly one is produced per matching file; a name
/// match suppresses the content check, so `kind` is never ambiguous.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub path: PathBuf,
    pub kind: MatchKind,
}

/// How a search session ended. Exactly one outcome is delivered per session,
/// always after every match event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The whole tree was visited.
    Completed,
    /// The cancellation signal was observed before the walk finished.
    Cancelled,
}

/// An element of a session's result stream: zero or more matches followed by
/// exactly one terminal `Finished` event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Match(MatchResult),
    Finished(SearchOutcome),
}

/// A shared, monotonic cancellation signal.
///
/// Once set it never resets. Cloning yields another handle to the same flag,
/// so the walker can observe a cancellation requested from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Returns the filename component of a path as UTF-8, or an empty string for
/// paths without one (e.g. `..`).
pub(crate) fn file_name_str(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

pub use self::matcher::classify;
pub use self::sink::EventSink;
pub use self::walker::Walker;
