//! # Lifecycle Event Publisher
//!
//! Broadcast publisher for artifact and workflow lifecycle events. Events are
//! fire-and-forget: publishing with no subscribers is fine, and a slow
//! subscriber lagging off the end of the channel never blocks the pipeline.

use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// A lifecycle event that has been published
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Unique id for correlating an event across log lines and subscribers
    pub id: Uuid,
    /// Event name, one of the constants in [`crate::constants::events`]
    pub name: String,
    /// Structured event context
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

/// Broadcast publisher for lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventPublisher {
    /// Create a publisher with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a lifecycle event
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, name: &str, context: Value) {
        let event = LifecycleEvent {
            id: Uuid::new_v4(),
            name: name.to_string(),
            context,
            published_at: chrono::Utc::now(),
        };
        // send() errs only when there are no receivers
        let _ = self.sender.send(event);
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::events;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let publisher = EventPublisher::new(8);
        let mut receiver = publisher.subscribe();

        publisher.publish(
            events::ARTIFACT_RECEIVED,
            json!({"store_id": "in", "object_key": "inv1.pdf"}),
        );

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.name, events::ARTIFACT_RECEIVED);
        assert_eq!(event.context["object_key"], "inv1.pdf");
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::default();
        publisher.publish(events::WORKFLOW_EXECUTION_STARTED, json!({}));
        assert_eq!(publisher.subscriber_count(), 0);
    }
}
