//! # Date Normalization
//!
//! Canonicalizes raw date strings into ISO-8601 through the
//! [`DateNormalizer`] seam. The contract deliberately splits two conditions
//! the original pipeline collapsed: input the service could not parse yields
//! [`NormalizedDate::Unknown`] and the pipeline proceeds with a missing date,
//! while an unreachable service is a transient error that surfaces to the
//! caller's retry policy.

pub mod formats;
pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::date_formats;

pub use http::{HttpDateNormalizer, LocalDateNormalizer};

/// Outcome of normalizing one raw date string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedDate {
    /// Canonical ISO-8601 date
    Canonical(NaiveDate),
    /// The input was empty or matched no accepted format
    Unknown,
}

impl NormalizedDate {
    /// Render as `YYYY-MM-DD`; `None` for an unknown date
    pub fn iso8601(&self) -> Option<String> {
        match self {
            NormalizedDate::Canonical(date) => {
                Some(date.format(date_formats::CANONICAL).to_string())
            }
            NormalizedDate::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, NormalizedDate::Unknown)
    }
}

/// Failure modes of the normalization service itself
///
/// "The service answered and the date was unparseable" is NOT an error; it
/// is `Ok(NormalizedDate::Unknown)`.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Service unreachable or answered non-2xx; worth retrying
    #[error("date service unreachable: {0}")]
    Transient(String),

    /// Service answered 2xx with a payload the protocol does not allow
    #[error("date service returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl NormalizeError {
    /// Whether a bounded local retry may succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NormalizeError::Transient(_))
    }
}

/// Seam for the external date-normalization service
#[async_trait]
pub trait DateNormalizer: Send + Sync {
    /// Canonicalize one raw date string
    async fn normalize(&self, raw: &str) -> Result<NormalizedDate, NormalizeError>;
}
