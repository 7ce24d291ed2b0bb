//! # Ingest Coordinator
//!
//! The orchestration driver for one artifact invocation. Every external
//! collaborator comes in through a seam (`ObjectStore`, `DateNormalizer`,
//! `WorkflowEngine`, `Clock`), so the whole pipeline runs unchanged against
//! test doubles.
//!
//! Failure handling contract: any failure after intake routes the artifact
//! through the dead-letter router, then the original failure is re-signaled
//! to the caller so the hosting delivery system's own retry accounting can
//! engage. On success the coordinator performs no further action; the
//! artifact's lifecycle beyond that point belongs to the external workflow.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clock::{Clock, TokioClock};
use crate::config::IngestConfig;
use crate::constants::events;
use crate::dlq::{DeadLetterRouter, MoveOutcome};
use crate::error::{IngestError, Result};
use crate::events::{EventPublisher, IngestEvent, RawNotification};
use crate::normalize::{DateNormalizer, NormalizedDate};
use crate::resilience::RetryPolicy;
use crate::state_machine::{ExecutionMonitor, ExecutionState, MonitorError, WorkflowExecution};
use crate::store::ObjectStore;
use crate::workflow::{LaunchRequest, WorkflowEngine};

/// One raw date string extracted from the artifact, to be normalized into
/// the launch arguments under its field name
#[derive(Debug, Clone)]
pub struct DateField {
    pub name: String,
    pub raw: String,
}

impl DateField {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// Successful invocation summary
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub event: IngestEvent,
    pub execution_id: String,
    /// Normalized dates keyed by field name; `None` marks an unknown date
    pub normalized_dates: BTreeMap<String, Option<String>>,
}

/// Outcome of one invocation that returned normally
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The workflow execution succeeded; the artifact was left untouched
    Completed(IngestReceipt),
    /// The source artifact was already gone; a prior delivery of this event
    /// finished the failure handling, so this redelivery is a no-op
    AlreadyHandled,
    /// The notification could not identify an artifact; logged and dropped
    /// so the delivery system does not redeliver garbage forever
    Rejected { reason: String },
}

/// Orchestration driver for artifact ingestion
pub struct IngestCoordinator {
    config: IngestConfig,
    store: Arc<dyn ObjectStore>,
    normalizer: Arc<dyn DateNormalizer>,
    engine: Arc<dyn WorkflowEngine>,
    clock: Arc<dyn Clock>,
    publisher: EventPublisher,
    router: DeadLetterRouter,
    retry: RetryPolicy,
}

impl IngestCoordinator {
    /// Create a coordinator with the production clock and a fresh publisher
    pub fn new(
        config: IngestConfig,
        store: Arc<dyn ObjectStore>,
        normalizer: Arc<dyn DateNormalizer>,
        engine: Arc<dyn WorkflowEngine>,
    ) -> Self {
        Self::with_clock(config, store, normalizer, engine, Arc::new(TokioClock))
    }

    /// Create a coordinator with an explicit clock
    pub fn with_clock(
        config: IngestConfig,
        store: Arc<dyn ObjectStore>,
        normalizer: Arc<dyn DateNormalizer>,
        engine: Arc<dyn WorkflowEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let router = DeadLetterRouter::new(Arc::clone(&store), config.dlq_store_id.clone());
        let retry = RetryPolicy::new(&config.backoff);
        Self {
            config,
            store,
            normalizer,
            engine,
            clock,
            publisher: EventPublisher::default(),
            router,
            retry,
        }
    }

    /// Replace the lifecycle event publisher
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Lifecycle event publisher, for subscribing
    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    /// Process one "new object" notification end to end
    ///
    /// `date_fields` carries the raw date strings extracted from the
    /// artifact upstream; each is normalized into the launch arguments
    /// under its field name.
    pub async fn process(
        &self,
        notification: RawNotification,
        date_fields: &[DateField],
    ) -> Result<IngestOutcome> {
        let event = match IngestEvent::from_notification(notification) {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "Rejected malformed notification");
                self.publisher
                    .publish(events::ARTIFACT_REJECTED, json!({"error": e.to_string()}));
                return Ok(IngestOutcome::Rejected {
                    reason: e.to_string(),
                });
            }
        };

        info!(artifact = %event.artifact(), "📥 Artifact notification accepted");
        self.publisher.publish(
            events::ARTIFACT_RECEIVED,
            serde_json::to_value(&event)?,
        );

        // At-least-once delivery: if the artifact is already gone, a prior
        // delivery finished with it (dead-lettered or consumed) and this
        // redelivery must be a no-op.
        if !self.store.exists(&event.store_id, &event.object_key).await? {
            info!(
                artifact = %event.artifact(),
                "Artifact absent from source store, treating redelivery as already handled"
            );
            self.publisher.publish(
                events::ARTIFACT_ALREADY_HANDLED,
                serde_json::to_value(&event)?,
            );
            return Ok(IngestOutcome::AlreadyHandled);
        }

        match self.run_pipeline(&event, date_fields).await {
            Ok(receipt) => Ok(IngestOutcome::Completed(receipt)),
            Err(failure) => self.fail_with_dead_letter(&event, failure).await,
        }
    }

    /// The fallible stages: normalize, launch, monitor
    async fn run_pipeline(
        &self,
        event: &IngestEvent,
        date_fields: &[DateField],
    ) -> Result<IngestReceipt> {
        let normalized_dates = self.normalize_dates(date_fields).await?;
        let arguments = self.launch_arguments(event, &normalized_dates);

        self.publisher.publish(
            events::WORKFLOW_LAUNCH_REQUESTED,
            json!({"artifact": event.artifact().to_string()}),
        );
        let handle = self
            .retry
            .retry(
                "workflow.submit",
                self.clock.as_ref(),
                || {
                    let engine = Arc::clone(&self.engine);
                    let request = LaunchRequest {
                        parent: self.config.workflow_engine.parent.clone(),
                        arguments: arguments.clone(),
                    };
                    async move { engine.submit(request).await }
                },
                |e| e.is_recoverable(),
            )
            .await?;

        info!(
            artifact = %event.artifact(),
            execution_id = %handle,
            "🚀 Workflow execution started"
        );
        self.publisher.publish(
            events::WORKFLOW_EXECUTION_STARTED,
            json!({"execution_id": handle.execution_id}),
        );

        let mut execution = WorkflowExecution::new(handle, arguments);
        let monitor = ExecutionMonitor::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.clock),
            self.config.monitor.clone(),
            self.retry.clone(),
        );

        let terminal = match monitor.watch(&mut execution).await {
            Ok(state) => state,
            Err(MonitorError::PollExhausted {
                execution_id,
                attempts,
                message,
            }) => {
                return Err(IngestError::transient(
                    "workflow-engine",
                    format!(
                        "status polling for {execution_id} exhausted after {attempts} attempts: {message}"
                    ),
                ));
            }
            Err(MonitorError::StateMachine(e)) => {
                return Err(IngestError::configuration(e.to_string()));
            }
        };

        match terminal {
            ExecutionState::Succeeded => {
                self.publisher.publish(
                    events::WORKFLOW_EXECUTION_SUCCEEDED,
                    json!({"execution_id": execution.handle.execution_id}),
                );
                Ok(IngestReceipt {
                    event: event.clone(),
                    execution_id: execution.handle.execution_id.clone(),
                    normalized_dates,
                })
            }
            ExecutionState::Failed => {
                self.publisher.publish(
                    events::WORKFLOW_EXECUTION_FAILED,
                    json!({"execution_id": execution.handle.execution_id}),
                );
                Err(IngestError::ExecutionFailed {
                    execution_id: execution.handle.execution_id.clone(),
                })
            }
            ExecutionState::TimedOut => {
                self.publisher.publish(
                    events::WORKFLOW_EXECUTION_TIMED_OUT,
                    json!({"execution_id": execution.handle.execution_id}),
                );
                Err(IngestError::ExecutionTimeout {
                    execution_id: execution.handle.execution_id.clone(),
                    deadline_secs: self.config.monitor.deadline.as_secs(),
                })
            }
            ExecutionState::Running => {
                // watch() only returns terminal states
                Err(IngestError::configuration(
                    "monitor returned a non-terminal state",
                ))
            }
        }
    }

    /// Normalize every extracted date field, retrying transient service
    /// failures; an unparseable date is a missing date, not a failure
    async fn normalize_dates(
        &self,
        date_fields: &[DateField],
    ) -> Result<BTreeMap<String, Option<String>>> {
        let mut normalized = BTreeMap::new();
        for field in date_fields {
            let date = self
                .retry
                .retry(
                    "date.normalize",
                    self.clock.as_ref(),
                    || {
                        let normalizer = Arc::clone(&self.normalizer);
                        let raw = field.raw.clone();
                        async move { normalizer.normalize(&raw).await }
                    },
                    |e| e.is_recoverable(),
                )
                .await?;

            if matches!(date, NormalizedDate::Unknown) {
                warn!(
                    field = %field.name,
                    raw = %field.raw,
                    "Date not recognized, proceeding with missing date"
                );
            }
            normalized.insert(field.name.clone(), date.iso8601());
        }
        Ok(normalized)
    }

    /// Build the JSON arguments handed to the workflow execution
    fn launch_arguments(
        &self,
        event: &IngestEvent,
        normalized_dates: &BTreeMap<String, Option<String>>,
    ) -> Value {
        let mut arguments = Map::new();
        arguments.insert("store_id".to_string(), json!(event.store_id));
        arguments.insert("object_key".to_string(), json!(event.object_key));
        for (name, date) in normalized_dates {
            arguments.insert(name.clone(), json!(date));
        }
        Value::Object(arguments)
    }

    /// Route the artifact to the dead-letter store, then re-signal the
    /// original failure
    async fn fail_with_dead_letter(
        &self,
        event: &IngestEvent,
        failure: IngestError,
    ) -> Result<IngestOutcome> {
        error!(
            artifact = %event.artifact(),
            error = %failure,
            "Invocation failed, routing artifact to dead-letter store"
        );

        match self.router.route(event, &failure.to_string()).await {
            Ok(MoveOutcome::Moved(record)) => {
                self.publisher.publish(
                    events::ARTIFACT_DEAD_LETTERED,
                    serde_json::to_value(&record)?,
                );
                Err(failure)
            }
            Ok(MoveOutcome::AlreadyMoved) => Err(failure),
            Err(route_failure) => {
                // The artifact never reached the dead-letter store; surface
                // the copy failure so outer redelivery re-drives the move.
                error!(
                    artifact = %event.artifact(),
                    original_error = %failure,
                    error = %route_failure,
                    "Dead-letter move failed"
                );
                Err(route_failure)
            }
        }
    }
}
