//! Defines an abstraction over the result delivery mechanism.

use tokio::sync::mpsc::UnboundedSender;

use super::SearchEvent;

/// A trait that abstracts the sending of search events from the walker to
/// the consumer.
///
/// Sending is "fire-and-forget" and doesn't return a result: a session that
/// has been superseded keeps walking briefly after its receiver is dropped,
/// and its late events simply go nowhere.
pub trait EventSink: Send + 'static {
    fn send(&self, event: SearchEvent);
}

/// The production sink: an unbounded tokio channel. Delivery order equals
/// emission order, and the walker is never blocked by a slow consumer.
impl EventSink for UnboundedSender<SearchEvent> {
    fn send(&self, event: SearchEvent) {
        if let Err(e) = UnboundedSender::send(self, event) {
            tracing::debug!("Result receiver dropped, discarding event: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::{MatchResult, SearchEvent};
    use std::sync::{Arc, Mutex};

    /// A sink that records every event, for walker unit tests.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<SearchEvent>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SearchEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn matches(&self) -> Vec<MatchResult> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    SearchEvent::Match(result) => Some(result),
                    SearchEvent::Finished(_) => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn send(&self, event: SearchEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
