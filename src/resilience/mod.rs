//! # Resilience
//!
//! Bounded retry with exponential backoff for transiently-failing RPCs. A
//! single network blip on a status check or a date-service call must not
//! abort a whole monitored invocation, so those calls run through a
//! [`RetryPolicy`] before their failure is escalated.

pub mod retry;

pub use retry::RetryPolicy;
