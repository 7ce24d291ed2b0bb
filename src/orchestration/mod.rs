//! # Orchestration
//!
//! Sequences one ingestion invocation end to end: intake validation, date
//! normalization, workflow launch, execution monitoring, and dead-letter
//! routing on failure. One coordinator instance serves any number of
//! concurrent invocations; all per-invocation state lives on the stack.

pub mod coordinator;

pub use coordinator::{DateField, IngestCoordinator, IngestOutcome, IngestReceipt};
