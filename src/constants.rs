//! # System Constants
//!
//! Core constants that define the operational boundaries of the ingestion
//! orchestration core: lifecycle event names, dead-letter key derivation
//! inputs, the accepted date format table, and default timings.

/// Lifecycle events published by the coordinator for observability
pub mod events {
    // Artifact lifecycle events
    pub const ARTIFACT_RECEIVED: &str = "artifact.received";
    pub const ARTIFACT_ALREADY_HANDLED: &str = "artifact.already_handled";
    pub const ARTIFACT_REJECTED: &str = "artifact.rejected";
    pub const ARTIFACT_DEAD_LETTERED: &str = "artifact.dead_lettered";

    // Workflow execution lifecycle events
    pub const WORKFLOW_LAUNCH_REQUESTED: &str = "workflow.launch_requested";
    pub const WORKFLOW_EXECUTION_STARTED: &str = "workflow.execution_started";
    pub const WORKFLOW_EXECUTION_SUCCEEDED: &str = "workflow.execution_succeeded";
    pub const WORKFLOW_EXECUTION_FAILED: &str = "workflow.execution_failed";
    pub const WORKFLOW_EXECUTION_TIMED_OUT: &str = "workflow.execution_timed_out";
}

/// Dead-letter key derivation inputs
///
/// Relocated artifacts are stored under
/// `failed_event_<14-digit-timestamp>_<original_key>`.
pub mod dead_letter {
    /// Prefix for every dead-letter object key
    pub const KEY_PREFIX: &str = "failed_event_";

    /// 14-digit wall-clock timestamp embedded in the key
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

    /// Suffix of the JSON record bundle written beside the relocated artifact
    pub const RECORD_SUFFIX: &str = ".json";
}

/// Accepted date formats, tried in fixed priority order; the first match wins.
///
/// Month/day/year is deliberately ahead of day/month/year, so an ambiguous
/// slash-delimited date resolves as MDY.
pub mod date_formats {
    pub const PRIORITY: [&str; 8] = [
        "%Y-%m-%d",  // 2025-07-18
        "%m/%d/%Y",  // 07/30/2025
        "%d/%m/%Y",  // 30/07/2025
        "%Y/%m/%d",  // 2025/07/30
        "%b %d, %Y", // Jul 30, 2025
        "%B %d, %Y", // July 30, 2025
        "%d %b %Y",  // 30 Jul 2025
        "%d %B %Y",  // 30 July 2025
    ];

    /// Canonical output format (ISO-8601 date)
    pub const CANONICAL: &str = "%Y-%m-%d";
}

/// Default timings and bounds for the execution monitor and retry policy
pub mod defaults {
    /// Seconds between status polls while an execution is running
    pub const POLL_INTERVAL_SECS: u64 = 5;

    /// Monitor deadline; must stay below the hosting runtime's own
    /// invocation lifetime limit
    pub const MONITOR_DEADLINE_SECS: u64 = 300;

    /// Bounded attempts for a single transiently-failing RPC
    pub const RETRY_MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff between retry attempts
    pub const BACKOFF_BASE_MS: u64 = 1000;

    /// Upper bound on any single backoff delay
    pub const BACKOFF_MAX_MS: u64 = 60_000;

    /// HTTP request timeout for external service clients
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
}
