//! # Dead-Letter Routing
//!
//! Relocates a failed artifact into the dead-letter store together with a
//! structured failure record. The move is copy-then-delete: the copy is the
//! critical step and any failure there is fatal for the attempt, while a
//! delete failure after a successful copy is only logged, since keeping the
//! copied data is worth more than a clean source store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::constants::dead_letter;
use crate::error::{IngestError, Result};
use crate::events::IngestEvent;
use crate::store::ObjectStore;

/// Durable record written beside the relocated artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterRecord {
    pub original_store_id: String,
    pub original_object_key: String,
    pub dlq_object_key: String,
    pub failure_reason: String,
    pub original_event: IngestEvent,
    pub failed_at: DateTime<Utc>,
}

/// Result of one routing attempt
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Artifact and failure record are now in the dead-letter store and the
    /// source object is gone (or its deletion was logged as failed)
    Moved(DeadLetterRecord),
    /// The source artifact was already absent; a prior attempt moved it
    AlreadyMoved,
}

/// Derive the dead-letter key for one failed artifact
///
/// The timestamp keeps repeated failures of the same object from colliding.
pub fn dead_letter_key(failed_at: DateTime<Utc>, original_key: &str) -> String {
    format!(
        "{}{}_{}",
        dead_letter::KEY_PREFIX,
        failed_at.format(dead_letter::TIMESTAMP_FORMAT),
        original_key
    )
}

/// Moves failed artifacts to the dead-letter store, idempotently
pub struct DeadLetterRouter {
    store: Arc<dyn ObjectStore>,
    dlq_store_id: String,
}

impl DeadLetterRouter {
    pub fn new(store: Arc<dyn ObjectStore>, dlq_store_id: impl Into<String>) -> Self {
        Self {
            store,
            dlq_store_id: dlq_store_id.into(),
        }
    }

    /// Relocate the event's artifact to the dead-letter store
    ///
    /// A source artifact that is already absent means a prior attempt (or a
    /// concurrent redelivery) finished the move; that is success, not an
    /// error. Copy failure propagates so the hosting delivery system can
    /// re-drive the whole sequence.
    pub async fn route(&self, event: &IngestEvent, failure_reason: &str) -> Result<MoveOutcome> {
        let source_present = self
            .store
            .exists(&event.store_id, &event.object_key)
            .await?;
        if !source_present {
            info!(
                artifact = %event.artifact(),
                "Source artifact already absent, dead-letter move already handled"
            );
            return Ok(MoveOutcome::AlreadyMoved);
        }

        let failed_at = Utc::now();
        let dlq_object_key = dead_letter_key(failed_at, &event.object_key);

        self.store
            .copy(
                &event.store_id,
                &event.object_key,
                &self.dlq_store_id,
                &dlq_object_key,
            )
            .await
            .map_err(|e| IngestError::DlqCopy {
                key: dlq_object_key.clone(),
                message: e.to_string(),
            })?;

        let record = DeadLetterRecord {
            original_store_id: event.store_id.clone(),
            original_object_key: event.object_key.clone(),
            dlq_object_key: dlq_object_key.clone(),
            failure_reason: failure_reason.to_string(),
            original_event: event.clone(),
            failed_at,
        };
        let record_key = format!("{dlq_object_key}{}", dead_letter::RECORD_SUFFIX);
        let record_bytes = serde_json::to_vec(&record)?;
        self.store
            .put(
                &self.dlq_store_id,
                &record_key,
                record_bytes,
                "application/json",
            )
            .await
            .map_err(|e| IngestError::DlqCopy {
                key: record_key.clone(),
                message: e.to_string(),
            })?;

        error!(
            artifact = %event.artifact(),
            dlq_store_id = %self.dlq_store_id,
            dlq_object_key = %dlq_object_key,
            failure_reason = %failure_reason,
            "💀 Artifact moved to dead-letter store"
        );

        // Data safety over cleanliness: the copy is durable, so a failed
        // source delete is logged and left for operators.
        if let Err(e) = self.store.delete(&event.store_id, &event.object_key).await {
            warn!(
                artifact = %event.artifact(),
                error = %e,
                "Failed to delete source artifact after dead-letter copy"
            );
        }

        Ok(MoveOutcome::Moved(record))
    }
}
