//! # Event Intake
//!
//! Validates and normalizes inbound "new object" notifications. Events are
//! delivered at least once with no ordering guarantee, so everything
//! downstream must tolerate duplicates; intake's job is only to reject
//! notifications that could never identify an artifact safely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IngestError, Result};

/// Raw inbound notification, exactly as delivered by the event source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNotification {
    /// Identifier of the store the new object landed in
    pub store_id: String,
    /// Key of the new object within that store
    pub object_key: String,
}

/// Canonical identifier for one artifact, used by all downstream components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub store_id: String,
    pub object_key: String,
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store_id, self.object_key)
    }
}

/// Validated ingress event for one artifact
///
/// Immutable once constructed. The same event may arrive more than once;
/// redelivery handling belongs to the coordinator and the dead-letter
/// router, not to intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestEvent {
    pub store_id: String,
    pub object_key: String,
    pub received_at: DateTime<Utc>,
}

impl IngestEvent {
    /// Validate a raw notification into a canonical event
    ///
    /// Fails with a permanent validation error when `store_id` or
    /// `object_key` is empty or carries a path-escape sequence.
    pub fn from_notification(notification: RawNotification) -> Result<Self> {
        validate_store_id(&notification.store_id)?;
        validate_object_key(&notification.object_key)?;

        Ok(Self {
            store_id: notification.store_id,
            object_key: notification.object_key,
            received_at: Utc::now(),
        })
    }

    /// Canonical resource identifier for this event's artifact
    pub fn artifact(&self) -> ArtifactRef {
        ArtifactRef {
            store_id: self.store_id.clone(),
            object_key: self.object_key.clone(),
        }
    }
}

fn validate_store_id(store_id: &str) -> Result<()> {
    if store_id.is_empty() {
        return Err(IngestError::validation("store_id must not be empty"));
    }
    if store_id.contains('/') || store_id.contains('\\') || store_id.contains("..") {
        return Err(IngestError::validation(format!(
            "store_id {store_id:?} contains a path separator or escape sequence"
        )));
    }
    Ok(())
}

fn validate_object_key(object_key: &str) -> Result<()> {
    if object_key.is_empty() {
        return Err(IngestError::validation("object_key must not be empty"));
    }
    // Sub-paths are legal object keys; absolute paths, backslashes, and
    // parent-directory escapes are not.
    if object_key.starts_with('/') {
        return Err(IngestError::validation(format!(
            "object_key {object_key:?} must not be an absolute path"
        )));
    }
    if object_key.contains('\\') || object_key.split('/').any(|segment| segment == "..") {
        return Err(IngestError::validation(format!(
            "object_key {object_key:?} contains a path escape sequence"
        )));
    }
    Ok(())
}
