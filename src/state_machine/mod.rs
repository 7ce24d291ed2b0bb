// State machine for monitored workflow executions.
//
// One execution is owned by one invocation; its state only advances forward
// (RUNNING to exactly one terminal state) and the monitor drives that
// advance by polling the engine against a monotonic deadline.

pub mod execution;
pub mod monitor;
pub mod states;

pub use execution::{StateMachineError, WorkflowExecution};
pub use monitor::{ExecutionMonitor, MonitorError};
pub use states::ExecutionState;
