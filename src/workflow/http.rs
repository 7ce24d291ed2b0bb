//! # Workflow Engine HTTP Client
//!
//! HTTP client for a workflow engine exposing execution creation and status
//! lookup. Client errors (4xx) map to rejection, server errors (5xx) and
//! connection failures to transient errors, so the coordinator's retry
//! policy can tell them apart.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::WorkflowEngineConfig;

use super::{ExecutionHandle, ExecutionStatus, LaunchRequest, WorkflowClientError};

#[derive(Debug, Serialize)]
struct CreateExecutionRequest {
    /// Engine-side contract takes the arguments as an encoded JSON string
    argument: String,
}

#[derive(Debug, Deserialize)]
struct CreateExecutionResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GetExecutionResponse {
    state: ExecutionStatus,
}

/// HTTP client for the external workflow engine
#[derive(Debug, Clone)]
pub struct HttpWorkflowEngine {
    client: Client,
    base_url: Url,
}

impl HttpWorkflowEngine {
    pub fn new(config: &WorkflowEngineConfig) -> Result<Self, WorkflowClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            WorkflowClientError::Rejected(format!("invalid base URL {:?}: {e}", config.base_url))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| WorkflowClientError::Transient(format!("failed to build client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn executions_url(&self, parent: &str) -> Result<Url, WorkflowClientError> {
        self.base_url
            .join(&format!("{parent}/executions"))
            .map_err(|e| WorkflowClientError::Rejected(format!("invalid parent {parent:?}: {e}")))
    }

    fn execution_url(&self, handle: &ExecutionHandle) -> Result<Url, WorkflowClientError> {
        self.base_url.join(&handle.execution_id).map_err(|e| {
            WorkflowClientError::Rejected(format!("invalid execution id {handle}: {e}"))
        })
    }

    fn classify_status(status: StatusCode, body: String) -> WorkflowClientError {
        if status.is_client_error() {
            WorkflowClientError::Rejected(format!("{status}: {body}"))
        } else {
            WorkflowClientError::Transient(format!("{status}: {body}"))
        }
    }
}

#[async_trait]
impl super::WorkflowEngine for HttpWorkflowEngine {
    async fn submit(&self, request: LaunchRequest) -> Result<ExecutionHandle, WorkflowClientError> {
        let url = self.executions_url(&request.parent)?;
        let body = CreateExecutionRequest {
            argument: request.arguments.to_string(),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkflowClientError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let created: CreateExecutionResponse = response
            .json()
            .await
            .map_err(|e| WorkflowClientError::invalid_response("name", e.to_string()))?;
        if created.name.is_empty() {
            return Err(WorkflowClientError::invalid_response(
                "name",
                "empty execution name",
            ));
        }

        debug!(execution_id = %created.name, "Workflow execution created");
        Ok(ExecutionHandle::new(created.name))
    }

    async fn get_status(
        &self,
        handle: &ExecutionHandle,
    ) -> Result<ExecutionStatus, WorkflowClientError> {
        let url = self.execution_url(handle)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WorkflowClientError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let execution: GetExecutionResponse = response
            .json()
            .await
            .map_err(|e| WorkflowClientError::invalid_response("state", e.to_string()))?;
        Ok(execution.state)
    }
}
