//! # Execution Monitor
//!
//! Polls a submitted workflow execution until it reaches a terminal state or
//! the configured deadline elapses. The monitor suspends between polls
//! through the injected clock and runs each status call through the retry
//! policy, so a single network blip on the status check never aborts the
//! whole monitored execution.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::MonitorConfig;
use crate::resilience::RetryPolicy;
use crate::workflow::WorkflowEngine;

use super::execution::{StateMachineError, WorkflowExecution};
use super::states::ExecutionState;

/// Monitor failures that end the invocation without a terminal engine state
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Status polling kept failing transiently until the retry budget ran out
    #[error("status polling exhausted after {attempts} attempts for execution {execution_id}: {message}")]
    PollExhausted {
        execution_id: String,
        attempts: u32,
        message: String,
    },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

/// Polls one execution to a terminal state within a bounded time budget
pub struct ExecutionMonitor {
    engine: Arc<dyn WorkflowEngine>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
    retry: RetryPolicy,
}

impl ExecutionMonitor {
    pub fn new(
        engine: Arc<dyn WorkflowEngine>,
        clock: Arc<dyn Clock>,
        config: MonitorConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            engine,
            clock,
            config,
            retry,
        }
    }

    /// Drive the execution to a terminal state
    ///
    /// Returns the terminal state reached: `Succeeded`, `Failed`, or
    /// `TimedOut` once the deadline elapses while the engine still reports
    /// the execution running.
    pub async fn watch(
        &self,
        execution: &mut WorkflowExecution,
    ) -> Result<ExecutionState, MonitorError> {
        let deadline = self.clock.now() + self.config.deadline;

        loop {
            if self.clock.now() >= deadline {
                warn!(
                    execution_id = %execution.handle,
                    deadline_secs = self.config.deadline.as_secs(),
                    "⏰ Execution still running at deadline, resolving as timed out"
                );
                execution.advance(ExecutionState::TimedOut)?;
                return Ok(ExecutionState::TimedOut);
            }

            let status = {
                let engine = Arc::clone(&self.engine);
                let handle = execution.handle.clone();
                self.retry
                    .retry(
                        "workflow.get_status",
                        self.clock.as_ref(),
                        move || {
                            let engine = Arc::clone(&engine);
                            let handle = handle.clone();
                            async move { engine.get_status(&handle).await }
                        },
                        |e| e.is_recoverable(),
                    )
                    .await
                    .map_err(|e| MonitorError::PollExhausted {
                        execution_id: execution.handle.execution_id.clone(),
                        attempts: self.retry.max_attempts,
                        message: e.to_string(),
                    })?
            };

            match ExecutionState::from(status) {
                ExecutionState::Running => {
                    debug!(execution_id = %execution.handle, "Execution still running");
                    self.clock.sleep(self.config.poll_interval).await;
                }
                terminal => {
                    info!(
                        execution_id = %execution.handle,
                        state = %terminal,
                        "Execution reached terminal state"
                    );
                    execution.advance(terminal)?;
                    return Ok(terminal);
                }
            }
        }
    }
}
