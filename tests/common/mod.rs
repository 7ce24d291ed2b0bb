//! Shared test doubles for the orchestration integration tests.
//!
//! The fakes track calls and replay scripted behavior so tests can assert on
//! exactly how the coordinator drove its collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use ingest_core::clock::ManualClock;
use ingest_core::config::IngestConfig;
use ingest_core::normalize::{DateNormalizer, LocalDateNormalizer, NormalizeError, NormalizedDate};
use ingest_core::orchestration::IngestCoordinator;
use ingest_core::store::{InMemoryObjectStore, ObjectStore, StoreError};
use ingest_core::workflow::{
    ExecutionHandle, ExecutionStatus, LaunchRequest, WorkflowClientError, WorkflowEngine,
};

/// Workflow engine fake that replays a scripted poll sequence
pub struct ScriptedEngine {
    reject_submit: Option<String>,
    statuses: Mutex<VecDeque<Result<ExecutionStatus, WorkflowClientError>>>,
    /// Reported once the script is exhausted
    default_status: ExecutionStatus,
    pub submit_count: AtomicU32,
    pub poll_count: AtomicU32,
    last_arguments: Mutex<Option<Value>>,
}

impl ScriptedEngine {
    fn with_statuses(statuses: Vec<Result<ExecutionStatus, WorkflowClientError>>) -> Self {
        Self {
            reject_submit: None,
            statuses: Mutex::new(statuses.into()),
            default_status: ExecutionStatus::Running,
            submit_count: AtomicU32::new(0),
            poll_count: AtomicU32::new(0),
            last_arguments: Mutex::new(None),
        }
    }

    /// Reports running for `polls` polls, then succeeded
    pub fn succeeding_after(polls: usize) -> Self {
        let mut statuses: Vec<_> = (0..polls).map(|_| Ok(ExecutionStatus::Running)).collect();
        statuses.push(Ok(ExecutionStatus::Succeeded));
        Self::with_statuses(statuses)
    }

    /// Reports running for `polls` polls, then failed
    pub fn failing_after(polls: usize) -> Self {
        let mut statuses: Vec<_> = (0..polls).map(|_| Ok(ExecutionStatus::Running)).collect();
        statuses.push(Ok(ExecutionStatus::Failed));
        Self::with_statuses(statuses)
    }

    /// Never reaches a terminal state
    pub fn never_terminal() -> Self {
        Self::with_statuses(Vec::new())
    }

    /// Fails every execution, however often one is submitted
    pub fn always_failing() -> Self {
        let mut engine = Self::with_statuses(Vec::new());
        engine.default_status = ExecutionStatus::Failed;
        engine
    }

    /// Rejects every submission
    pub fn rejecting(reason: &str) -> Self {
        let mut engine = Self::with_statuses(Vec::new());
        engine.reject_submit = Some(reason.to_string());
        engine
    }

    /// Arguments of the most recent accepted submission
    pub fn last_arguments(&self) -> Option<Value> {
        self.last_arguments.lock().clone()
    }
}

#[async_trait]
impl WorkflowEngine for ScriptedEngine {
    async fn submit(&self, request: LaunchRequest) -> Result<ExecutionHandle, WorkflowClientError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.reject_submit {
            return Err(WorkflowClientError::Rejected(reason.clone()));
        }
        *self.last_arguments.lock() = Some(request.arguments);
        Ok(ExecutionHandle::new("exec-0001"))
    }

    async fn get_status(
        &self,
        _handle: &ExecutionHandle,
    ) -> Result<ExecutionStatus, WorkflowClientError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock();
        match statuses.pop_front() {
            Some(status) => status,
            None => Ok(self.default_status),
        }
    }
}

/// Object store wrapper with injectable copy/delete failures
pub struct FailingStore {
    inner: InMemoryObjectStore,
    pub fail_copy: AtomicBool,
    pub fail_delete: AtomicBool,
    pub copy_count: AtomicU32,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryObjectStore::new(),
            fail_copy: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            copy_count: AtomicU32::new(0),
        }
    }

    pub fn seed(&self, store_id: &str, key: &str, bytes: &[u8]) {
        self.inner.seed(store_id, key, bytes);
    }

    pub fn keys_in(&self, store_id: &str) -> Vec<String> {
        self.inner.keys_in(store_id)
    }

    pub fn object_count(&self, store_id: &str) -> usize {
        self.inner.object_count(store_id)
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn copy(
        &self,
        src_store: &str,
        src_key: &str,
        dst_store: &str,
        dst_key: &str,
    ) -> Result<(), StoreError> {
        self.copy_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected copy failure".to_string()));
        }
        self.inner.copy(src_store, src_key, dst_store, dst_key).await
    }

    async fn delete(&self, store_id: &str, key: &str) -> Result<(), StoreError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected delete failure".to_string()));
        }
        self.inner.delete(store_id, key).await
    }

    async fn exists(&self, store_id: &str, key: &str) -> Result<bool, StoreError> {
        self.inner.exists(store_id, key).await
    }

    async fn put(
        &self,
        store_id: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.inner.put(store_id, key, bytes, content_type).await
    }

    async fn get(&self, store_id: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.get(store_id, key).await
    }
}

/// Date normalizer fake whose service is permanently unreachable
pub struct UnreachableNormalizer;

#[async_trait]
impl DateNormalizer for UnreachableNormalizer {
    async fn normalize(&self, _raw: &str) -> Result<NormalizedDate, NormalizeError> {
        Err(NormalizeError::Transient("date service down".to_string()))
    }
}

/// Test configuration: primary store "in", dead-letter store "dlq", fast
/// timings, manual clock
pub fn test_config() -> IngestConfig {
    let mut config = IngestConfig::for_testing();
    config.dlq_store_id = "dlq".to_string();
    config
}

/// Standard coordinator wiring over the shared fakes
pub fn coordinator(
    store: Arc<dyn ObjectStore>,
    engine: Arc<dyn WorkflowEngine>,
) -> IngestCoordinator {
    IngestCoordinator::with_clock(
        test_config(),
        store,
        Arc::new(LocalDateNormalizer),
        engine,
        Arc::new(ManualClock::new()),
    )
}

/// Check a dead-letter key has the shape
/// `failed_event_<14-digit-timestamp>_<original_key>`
pub fn assert_dead_letter_key(key: &str, original_key: &str) {
    let rest = key
        .strip_prefix("failed_event_")
        .unwrap_or_else(|| panic!("key {key:?} missing failed_event_ prefix"));
    let (timestamp, suffix) = rest.split_at(14);
    assert!(
        timestamp.chars().all(|c| c.is_ascii_digit()),
        "key {key:?} timestamp {timestamp:?} is not 14 digits"
    );
    assert_eq!(
        suffix,
        format!("_{original_key}"),
        "key {key:?} does not end with the original key"
    );
}
