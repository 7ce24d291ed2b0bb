//! # Workflow Engine Interface
//!
//! Seam for the external workflow engine: submit an execution and poll its
//! status. The launcher never retries internally; retry policy belongs to
//! the coordinator, which owns the invocation's failure handling.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use http::HttpWorkflowEngine;

/// Opaque handle for one workflow execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionHandle {
    pub execution_id: String,
}

impl ExecutionHandle {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
        }
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.execution_id)
    }
}

/// Execution submission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Fully-qualified workflow resource to create the execution under
    pub parent: String,
    /// JSON arguments handed to the execution
    pub arguments: serde_json::Value,
}

/// Execution status as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
}

/// Workflow engine client failures
#[derive(Debug, Error)]
pub enum WorkflowClientError {
    /// The engine rejected the request; retrying the same request will not help
    #[error("workflow engine rejected request: {0}")]
    Rejected(String),

    /// The engine was unreachable or answered a server error; worth retrying
    #[error("workflow engine unreachable: {0}")]
    Transient(String),

    /// The engine answered 2xx with a payload the protocol does not allow
    #[error("workflow engine returned an invalid response: {field}: {reason}")]
    InvalidResponse { field: String, reason: String },
}

impl WorkflowClientError {
    pub fn invalid_response(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether a bounded local retry may succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WorkflowClientError::Transient(_))
    }
}

/// Seam for the external workflow engine
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Submit a new execution; returns an opaque handle on acceptance
    async fn submit(&self, request: LaunchRequest) -> Result<ExecutionHandle, WorkflowClientError>;

    /// Report the current status of a previously submitted execution
    async fn get_status(
        &self,
        handle: &ExecutionHandle,
    ) -> Result<ExecutionStatus, WorkflowClientError>;
}
