//! # Date Normalization Clients
//!
//! Two implementations of the [`DateNormalizer`] seam: an HTTP client for
//! the external parsing service, and a local implementation over the same
//! format table for tests and offline runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DateServiceConfig;
use crate::constants::date_formats;

use super::formats::parse_with_priority;
use super::{DateNormalizer, NormalizeError, NormalizedDate};

#[derive(Debug, Serialize)]
struct NormalizeRequest<'a> {
    date_string: &'a str,
}

#[derive(Debug, Deserialize)]
struct NormalizeResponse {
    parsed_date: Option<String>,
}

/// HTTP client for the external date-normalization service
///
/// Wire contract: `POST {base_url}` with `{"date_string": …}` returns
/// `{"parsed_date": "YYYY-MM-DD" | null}`. A 200 carrying `null` means the
/// date was unparseable; a non-2xx status or a connection failure is a
/// transient service error and is kept distinct.
#[derive(Debug, Clone)]
pub struct HttpDateNormalizer {
    client: Client,
    config: DateServiceConfig,
}

impl HttpDateNormalizer {
    pub fn new(config: DateServiceConfig) -> Result<Self, NormalizeError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NormalizeError::Transient(format!("failed to build client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Apply the lenient compatibility toggle to a transient failure
    fn degrade_if_lenient(
        &self,
        raw: &str,
        err: NormalizeError,
    ) -> Result<NormalizedDate, NormalizeError> {
        if self.config.lenient && err.is_recoverable() {
            warn!(
                raw = %raw,
                error = %err,
                "Date service unreachable; lenient mode degrades to unknown date"
            );
            return Ok(NormalizedDate::Unknown);
        }
        Err(err)
    }
}

#[async_trait]
impl DateNormalizer for HttpDateNormalizer {
    async fn normalize(&self, raw: &str) -> Result<NormalizedDate, NormalizeError> {
        if raw.trim().is_empty() {
            return Ok(NormalizedDate::Unknown);
        }

        let response = match self
            .client
            .post(&self.config.base_url)
            .json(&NormalizeRequest { date_string: raw })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return self.degrade_if_lenient(raw, NormalizeError::Transient(e.to_string()))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return self.degrade_if_lenient(
                raw,
                NormalizeError::Transient(format!("date service answered {status}")),
            );
        }

        let body: NormalizeResponse = response
            .json()
            .await
            .map_err(|e| NormalizeError::InvalidResponse(e.to_string()))?;

        match body.parsed_date {
            None => {
                debug!(raw = %raw, "Date service could not parse input");
                Ok(NormalizedDate::Unknown)
            }
            Some(parsed) => {
                let date = NaiveDate::parse_from_str(&parsed, date_formats::CANONICAL)
                    .map_err(|_| {
                        NormalizeError::InvalidResponse(format!(
                            "parsed_date {parsed:?} is not an ISO-8601 date"
                        ))
                    })?;
                Ok(NormalizedDate::Canonical(date))
            }
        }
    }
}

/// In-process normalizer over the same fixed-priority format table
///
/// Behaves exactly like a healthy parsing service; used by tests and local
/// runs that have no service to call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDateNormalizer;

#[async_trait]
impl DateNormalizer for LocalDateNormalizer {
    async fn normalize(&self, raw: &str) -> Result<NormalizedDate, NormalizeError> {
        Ok(parse_with_priority(raw))
    }
}
