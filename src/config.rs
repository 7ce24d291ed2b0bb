//! # Configuration
//!
//! Explicit configuration for one ingestion deployment: store identifiers,
//! external service endpoints, monitor timings, and retry bounds. Values come
//! from [`IngestConfig::default`] overridden by `INGEST_*` environment
//! variables through [`IngestConfig::from_env`].

use std::time::Duration;

use crate::constants::defaults;
use crate::error::{IngestError, Result};

/// Top-level configuration for the ingestion orchestration core
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Dead-letter store identifier (destination for failed artifacts)
    pub dlq_store_id: String,
    /// Date-normalization service client settings
    pub date_service: DateServiceConfig,
    /// Workflow engine client settings
    pub workflow_engine: WorkflowEngineConfig,
    /// Execution monitor timings
    pub monitor: MonitorConfig,
    /// Retry bounds for transiently-failing RPCs
    pub backoff: BackoffConfig,
}

/// Date-normalization service client settings
#[derive(Debug, Clone)]
pub struct DateServiceConfig {
    /// Base URL of the date-normalization service
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Compatibility toggle: when set, a transiently-unreachable date
    /// service degrades to an unknown date instead of failing the invocation
    pub lenient: bool,
}

/// Workflow engine client settings
#[derive(Debug, Clone)]
pub struct WorkflowEngineConfig {
    /// Base URL of the workflow engine API
    pub base_url: String,
    /// Fully-qualified workflow resource submissions are created under
    pub parent: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Execution monitor timings
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between status polls while an execution is running
    pub poll_interval: Duration,
    /// Deadline for the whole monitored execution, measured against the
    /// monotonic clock; must stay below the hosting runtime's own limit
    pub deadline: Duration,
}

/// Retry bounds for transiently-failing RPCs
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Maximum attempts for a single logical call (first try included)
    pub max_attempts: u32,
    /// Base delay before the first retry
    pub base_delay_ms: u64,
    /// Cap applied to any single backoff delay
    pub max_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            dlq_store_id: "artifacts-dlq".to_string(),
            date_service: DateServiceConfig {
                base_url: "http://localhost:8081".to_string(),
                timeout_ms: defaults::REQUEST_TIMEOUT_MS,
                lenient: false,
            },
            workflow_engine: WorkflowEngineConfig {
                base_url: "http://localhost:8082".to_string(),
                parent: "workflows/artifact-processing".to_string(),
                timeout_ms: defaults::REQUEST_TIMEOUT_MS,
            },
            monitor: MonitorConfig {
                poll_interval: Duration::from_secs(defaults::POLL_INTERVAL_SECS),
                deadline: Duration::from_secs(defaults::MONITOR_DEADLINE_SECS),
            },
            backoff: BackoffConfig {
                max_attempts: defaults::RETRY_MAX_ATTEMPTS,
                base_delay_ms: defaults::BACKOFF_BASE_MS,
                max_delay_ms: defaults::BACKOFF_MAX_MS,
            },
        }
    }
}

impl IngestConfig {
    /// Build configuration from defaults overridden by `INGEST_*`
    /// environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dlq) = std::env::var("INGEST_DLQ_STORE_ID") {
            config.dlq_store_id = dlq;
        }
        if let Ok(url) = std::env::var("INGEST_DATE_SERVICE_URL") {
            config.date_service.base_url = url;
        }
        if let Ok(lenient) = std::env::var("INGEST_DATE_SERVICE_LENIENT") {
            config.date_service.lenient = lenient.parse().map_err(|e| {
                IngestError::configuration(format!("Invalid INGEST_DATE_SERVICE_LENIENT: {e}"))
            })?;
        }
        if let Ok(url) = std::env::var("INGEST_WORKFLOW_ENGINE_URL") {
            config.workflow_engine.base_url = url;
        }
        if let Ok(parent) = std::env::var("INGEST_WORKFLOW_PARENT") {
            config.workflow_engine.parent = parent;
        }
        if let Ok(secs) = std::env::var("INGEST_POLL_INTERVAL_SECS") {
            config.monitor.poll_interval = Duration::from_secs(secs.parse().map_err(|e| {
                IngestError::configuration(format!("Invalid INGEST_POLL_INTERVAL_SECS: {e}"))
            })?);
        }
        if let Ok(secs) = std::env::var("INGEST_MONITOR_DEADLINE_SECS") {
            config.monitor.deadline = Duration::from_secs(secs.parse().map_err(|e| {
                IngestError::configuration(format!("Invalid INGEST_MONITOR_DEADLINE_SECS: {e}"))
            })?);
        }
        if let Ok(attempts) = std::env::var("INGEST_RETRY_MAX_ATTEMPTS") {
            config.backoff.max_attempts = attempts.parse().map_err(|e| {
                IngestError::configuration(format!("Invalid INGEST_RETRY_MAX_ATTEMPTS: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Configuration with short timings for tests
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.monitor.poll_interval = Duration::from_millis(10);
        config.monitor.deadline = Duration::from_millis(200);
        config.backoff.base_delay_ms = 1;
        config.backoff.max_delay_ms = 5;
        config
    }
}
