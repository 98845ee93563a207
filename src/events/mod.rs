//! Event system foundation: in-process lifecycle event publishing.

pub mod publisher;

pub use publisher::{EventPublisher, PublishError, PublishedEvent};
