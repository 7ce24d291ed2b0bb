//! # Error Types
//!
//! Unified error taxonomy for the ingestion orchestration core. Component
//! modules define their own focused error enums; everything converges here so
//! the coordinator can classify a failure once and decide between dropping,
//! retrying, and routing to the dead-letter store.

use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::store::StoreError;
use crate::workflow::WorkflowClientError;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, IngestError>;

/// Failure kinds an ingestion invocation can end with
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed ingress event; permanent, never retried
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An external collaborator was unreachable; bounded retry then escalate
    #[error("Transient failure from {service}: {message}")]
    TransientService { service: String, message: String },

    /// An external collaborator answered with something the protocol does
    /// not allow; not recoverable by retrying
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    /// The workflow engine rejected the submission outright
    #[error("Workflow launch rejected: {0}")]
    Launch(String),

    /// The workflow execution reached the FAILED terminal state
    #[error("Workflow execution {execution_id} failed")]
    ExecutionFailed { execution_id: String },

    /// The monitor deadline elapsed while the execution was still running
    #[error("Workflow execution {execution_id} still running after {deadline_secs}s deadline")]
    ExecutionTimeout {
        execution_id: String,
        deadline_secs: u64,
    },

    /// Copy into the dead-letter store failed; fatal for this attempt so the
    /// hosting delivery system can re-drive the whole sequence
    #[error("Dead-letter copy failed for {key}: {message}")]
    DlqCopy { key: String, message: String },

    /// Object store operation failed outside the dead-letter copy phase
    #[error("Object store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IngestError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a transient service error
    pub fn transient(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransientService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check whether the hosting delivery system should re-drive the
    /// invocation (as opposed to a failure that is already final)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            IngestError::TransientService { .. } => true,
            IngestError::Store(e) => e.is_recoverable(),
            // The artifact never reached the dead-letter store; outer
            // redelivery re-drives the move
            IngestError::DlqCopy { .. } => true,
            IngestError::Validation(_)
            | IngestError::InvalidResponse { .. }
            | IngestError::Launch(_)
            | IngestError::ExecutionFailed { .. }
            | IngestError::ExecutionTimeout { .. }
            | IngestError::Configuration(_)
            | IngestError::Serialization(_) => false,
        }
    }
}

impl From<NormalizeError> for IngestError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Transient(message) => IngestError::TransientService {
                service: "date-normalization".to_string(),
                message,
            },
            NormalizeError::InvalidResponse(message) => IngestError::InvalidResponse {
                service: "date-normalization".to_string(),
                message,
            },
        }
    }
}

impl From<WorkflowClientError> for IngestError {
    fn from(err: WorkflowClientError) -> Self {
        match err {
            WorkflowClientError::Rejected(message) => IngestError::Launch(message),
            WorkflowClientError::Transient(message) => IngestError::TransientService {
                service: "workflow-engine".to_string(),
                message,
            },
            WorkflowClientError::InvalidResponse { field, reason } => {
                IngestError::InvalidResponse {
                    service: "workflow-engine".to_string(),
                    message: format!("{field}: {reason}"),
                }
            }
        }
    }
}
