// Declare all modules as public so they can be used by the binary and tests.
pub mod controller;
pub mod core;
pub mod utils;

pub use crate::controller::{SearchController, SearchStatus, SearchStream};
pub use crate::core::error::SearchError;
pub use crate::core::{MatchKind, MatchResult, SearchEvent, SearchOutcome, SearchRequest};
