use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::ExecutionHandle;

use super::states::ExecutionState;

/// State machine violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateMachineError {
    /// Execution state only advances forward; terminal states never regress
    #[error("invalid execution state transition from {from} to {to}")]
    InvalidTransition {
        from: ExecutionState,
        to: ExecutionState,
    },
}

/// One monitored workflow execution, owned by a single invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub handle: ExecutionHandle,
    pub arguments: serde_json::Value,
    state: ExecutionState,
    pub started_at: DateTime<Utc>,
}

impl WorkflowExecution {
    /// Track a freshly submitted execution
    pub fn new(handle: ExecutionHandle, arguments: serde_json::Value) -> Self {
        Self {
            handle,
            arguments,
            state: ExecutionState::default(),
            started_at: Utc::now(),
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Advance the execution state
    ///
    /// Re-asserting the current state is a no-op; any other transition out
    /// of a terminal state is rejected.
    pub fn advance(&mut self, next: ExecutionState) -> Result<ExecutionState, StateMachineError> {
        match (self.state, next) {
            (from, to) if from == to => {}
            (ExecutionState::Running, to) if to.is_terminal() => {
                self.state = to;
            }
            (from, to) => return Err(StateMachineError::InvalidTransition { from, to }),
        }
        Ok(self.state)
    }
}
