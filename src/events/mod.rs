//! # Event Intake and Lifecycle Publishing
//!
//! Ingress side of the pipeline: validates raw "new object" notifications
//! into canonical [`IngestEvent`]s, and publishes lifecycle events the rest
//! of the system (or an operator tail) can subscribe to.

pub mod intake;
pub mod publisher;

pub use intake::{ArtifactRef, IngestEvent, RawNotification};
pub use publisher::{EventPublisher, LifecycleEvent};
