use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// In-process publisher for lifecycle events.
///
/// Synchronous fan-out over unbounded channels; publishing without
/// subscribers is a no-op, and subscribers that dropped their receiver are
/// pruned on the next publish.
#[derive(Debug, Clone, Default)]
pub struct EventPublisher {
    senders: Arc<Mutex<Vec<Sender<PublishedEvent>>>>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub context: Value,
    pub published_at: DateTime<Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with no subscribers
    pub fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publish an event with the given name and context
    pub fn publish(
        &self,
        event_name: impl Into<String>,
        context: Value,
    ) -> Result<(), PublishError> {
        let event = PublishedEvent {
            name: event_name.into(),
            context,
            published_at: Utc::now(),
        };

        let mut senders = self.senders.lock();
        senders.retain(|sender| sender.send(event.clone()).is_ok());
        Ok(())
    }

    /// Subscribe to all events published from now on
    pub fn subscribe(&self) -> Receiver<PublishedEvent> {
        let (sender, receiver) = channel::unbounded();
        self.senders.lock().push(sender);
        receiver
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().len()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event channel is closed")]
    ChannelClosed,
}
