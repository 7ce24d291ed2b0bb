//! # Ingest Core
//!
//! Orchestration core for document artifact ingestion. When a new artifact
//! lands in a blob store, one invocation of this core validates the
//! notification, canonicalizes the artifact's embedded date strings through
//! an external parsing service, launches a long-running workflow execution,
//! polls that execution to a terminal state within a bounded time budget,
//! and on any failure relocates the artifact to a dead-letter store together
//! with structured failure context.
//!
//! ## Architecture
//!
//! Every external collaborator sits behind a seam owned by the coordinator:
//!
//! - [`store::ObjectStore`] — the primary/dead-letter artifact store pair
//! - [`normalize::DateNormalizer`] — the date canonicalization service
//! - [`workflow::WorkflowEngine`] — the external workflow engine
//! - [`clock::Clock`] — monotonic time and cooperative sleep
//!
//! Clients are constructed explicitly and injected, never held globally, so
//! the whole pipeline runs unchanged against test doubles.
//!
//! ## Module Organization
//!
//! - [`events`] - Notification intake and lifecycle event publishing
//! - [`normalize`] - Date normalization clients
//! - [`workflow`] - Workflow engine clients
//! - [`state_machine`] - Execution states and the polling monitor
//! - [`dlq`] - Dead-letter routing
//! - [`orchestration`] - The per-invocation coordinator
//! - [`resilience`] - Bounded retry with backoff
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ingest_core::config::IngestConfig;
//! use ingest_core::events::RawNotification;
//! use ingest_core::normalize::LocalDateNormalizer;
//! use ingest_core::orchestration::{DateField, IngestCoordinator};
//! use ingest_core::store::InMemoryObjectStore;
//! use ingest_core::workflow::HttpWorkflowEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IngestConfig::from_env()?;
//! let engine = Arc::new(HttpWorkflowEngine::new(&config.workflow_engine)?);
//! let coordinator = IngestCoordinator::new(
//!     config,
//!     Arc::new(InMemoryObjectStore::new()),
//!     Arc::new(LocalDateNormalizer),
//!     engine,
//! );
//!
//! let outcome = coordinator
//!     .process(
//!         RawNotification {
//!             store_id: "invoices".to_string(),
//!             object_key: "inv1.pdf".to_string(),
//!         },
//!         &[DateField::new("invoice_date", "07/30/2025")],
//!     )
//!     .await?;
//! println!("invocation finished: {outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod constants;
pub mod dlq;
pub mod error;
pub mod events;
pub mod logging;
pub mod normalize;
pub mod orchestration;
pub mod resilience;
pub mod state_machine;
pub mod store;
pub mod workflow;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::IngestConfig;
pub use dlq::{DeadLetterRecord, DeadLetterRouter, MoveOutcome};
pub use error::{IngestError, Result};
pub use events::{EventPublisher, IngestEvent, RawNotification};
pub use normalize::{DateNormalizer, NormalizedDate};
pub use orchestration::{DateField, IngestCoordinator, IngestOutcome, IngestReceipt};
pub use state_machine::{ExecutionMonitor, ExecutionState, WorkflowExecution};
pub use store::{InMemoryObjectStore, ObjectStore};
pub use workflow::{ExecutionHandle, ExecutionStatus, WorkflowEngine};
