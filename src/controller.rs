//! Owns the single in-flight search session and its lifecycle.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::core::error::SearchError;
use crate::core::sink::EventSink;
use crate::core::{CancelFlag, SearchEvent, SearchOutcome, SearchRequest, Walker};

/// The consumer end of a session's result stream: match events in discovery
/// order, closed by exactly one `Finished` event.
pub type SearchStream = UnboundedReceiver<SearchEvent>;

/// Observable lifecycle of the controller's current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// No session has been started, or the last start failed validation.
    Idle,
    /// A session is in flight. A cancelled session stays `Running` until
    /// the walker observes the flag and the terminal event is published.
    Running,
    Completed,
    Cancelled,
}

const STATUS_RUNNING: u8 = 0;
const STATUS_COMPLETED: u8 = 1;
const STATUS_CANCELLED: u8 = 2;

/// Shared status cell written once by the session task on termination.
struct StatusCell(AtomicU8);

impl StatusCell {
    fn new() -> Self {
        Self(AtomicU8::new(STATUS_RUNNING))
    }

    fn set(&self, outcome: SearchOutcome) {
        let value = match outcome {
            SearchOutcome::Completed => STATUS_COMPLETED,
            SearchOutcome::Cancelled => STATUS_CANCELLED,
        };
        self.0.store(value, Ordering::SeqCst);
    }

    fn get(&self) -> SearchStatus {
        match self.0.load(Ordering::SeqCst) {
            STATUS_COMPLETED => SearchStatus::Completed,
            STATUS_CANCELLED => SearchStatus::Cancelled,
            _ => SearchStatus::Running,
        }
    }
}

/// The controller's record of a live search: the cancellation flag it can
/// set and the status cell the background task reports into.
struct SearchSession {
    cancel: CancelFlag,
    status: Arc<StatusCell>,
}

/// Starts, supersedes, and cancels search sessions.
///
/// At most one session is ever current: starting a new search signals
/// cancellation to any running one (fire-and-forget, without waiting for the
/// walker to observe it) and discards it. This mirrors the walker's
/// cooperative cancellation model; a superseded session winds down on its
/// own and its remaining events go to a dropped receiver.
pub struct SearchController {
    session: Option<SearchSession>,
}

impl SearchController {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Validates the request and launches the walker on a blocking task,
    /// returning the stream of results. Any previous session is cancelled
    /// first, even when the new request turns out to be invalid.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self, request: SearchRequest) -> Result<SearchStream, SearchError> {
        if let Some(previous) = self.session.take() {
            tracing::info!("Superseding current search session");
            previous.cancel.cancel();
        }

        request.validate()?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancel = CancelFlag::new();
        let status = Arc::new(StatusCell::new());

        let task_cancel = cancel.clone();
        let task_status = status.clone();
        tokio::task::spawn_blocking(move || {
            let walker = Walker::new(request.keyword);
            let outcome = walker.run(&request.root, &event_tx, &task_cancel);
            // Status is terminal before the consumer can see the terminal
            // event, so a drained stream never observes `Running`.
            task_status.set(outcome);
            EventSink::send(&event_tx, SearchEvent::Finished(outcome));
        });

        self.session = Some(SearchSession { cancel, status });
        Ok(event_rx)
    }

    /// Requests cancellation of the current session, if any. Fire-and-forget:
    /// the walker stops at its next entry boundary and the stream still
    /// receives its `Finished(Cancelled)` terminal event.
    pub fn cancel(&self) {
        if let Some(session) = &self.session {
            tracing::info!("Cancellation requested");
            session.cancel.cancel();
        }
    }

    pub fn status(&self) -> SearchStatus {
        match &self.session {
            Some(session) => session.status.get(),
            None => SearchStatus::Idle,
        }
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

/// A controller going away takes its session with it: the walker is
/// signalled and winds down on its own.
impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel();
    }
}
