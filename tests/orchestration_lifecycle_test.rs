//! End-to-end invocation lifecycle: success leaves the artifact alone,
//! every failure mode routes it to the dead-letter store exactly once, and
//! redelivered events are harmless.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ingest_core::error::IngestError;
use ingest_core::orchestration::{DateField, IngestOutcome};
use ingest_core::store::{InMemoryObjectStore, ObjectStore};

use common::{
    assert_dead_letter_key, coordinator, test_config, ScriptedEngine, UnreachableNormalizer,
};

fn notification(store_id: &str, object_key: &str) -> ingest_core::events::RawNotification {
    ingest_core::events::RawNotification {
        store_id: store_id.to_string(),
        object_key: object_key.to_string(),
    }
}

#[tokio::test]
async fn test_successful_execution_leaves_artifact_untouched() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::succeeding_after(2));

    let outcome = coordinator(Arc::clone(&store) as Arc<dyn ObjectStore>, Arc::clone(&engine) as _)
        .process(
            notification("in", "inv1.pdf"),
            &[DateField::new("invoice_date", "2025-07-18")],
        )
        .await
        .unwrap();

    let receipt = match outcome {
        IngestOutcome::Completed(receipt) => receipt,
        other => panic!("expected Completed, got {other:?}"),
    };
    assert_eq!(receipt.execution_id, "exec-0001");
    assert_eq!(
        receipt.normalized_dates["invoice_date"].as_deref(),
        Some("2025-07-18")
    );

    // Artifact untouched, failure router never invoked
    assert!(store.exists("in", "inv1.pdf").await.unwrap());
    assert_eq!(store.object_count("dlq"), 0);
}

#[tokio::test]
async fn test_failed_execution_moves_artifact_to_dead_letter_store() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::failing_after(1));

    let err = coordinator(Arc::clone(&store) as _, engine)
        .process(notification("in", "inv1.pdf"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::ExecutionFailed { .. }));
    assert!(!store.exists("in", "inv1.pdf").await.unwrap());

    // Artifact plus its JSON failure record
    let mut keys = store.keys_in("dlq");
    keys.sort();
    assert_eq!(keys.len(), 2);
    assert_dead_letter_key(&keys[0], "inv1.pdf");
    assert_eq!(keys[1], format!("{}.json", keys[0]));

    let record: ingest_core::dlq::DeadLetterRecord =
        serde_json::from_slice(&store.get("dlq", &keys[1]).await.unwrap()).unwrap();
    assert_eq!(record.original_store_id, "in");
    assert_eq!(record.original_object_key, "inv1.pdf");
    assert_eq!(record.original_event.store_id, "in");
    assert_eq!(record.original_event.object_key, "inv1.pdf");
}

#[tokio::test]
async fn test_launch_rejection_routes_to_dead_letter_store() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::rejecting("workflow engine rejected submission"));

    let err = coordinator(Arc::clone(&store) as _, engine)
        .process(notification("in", "inv1.pdf"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Launch(_)));
    assert!(!store.exists("in", "inv1.pdf").await.unwrap());

    let artifact_key = store
        .keys_in("dlq")
        .into_iter()
        .find(|key| !key.ends_with(".json"))
        .expect("dead-letter artifact present");
    assert_dead_letter_key(&artifact_key, "inv1.pdf");
}

#[tokio::test]
async fn test_deadline_elapsing_resolves_timed_out_and_moves_once() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::never_terminal());

    let err = coordinator(Arc::clone(&store) as _, Arc::clone(&engine) as _)
        .process(notification("in", "inv1.pdf"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::ExecutionTimeout { .. }));
    assert!(engine.poll_count.load(Ordering::SeqCst) > 0);
    assert!(!store.exists("in", "inv1.pdf").await.unwrap());

    // Exactly one move: one relocated artifact, one record
    let keys = store.keys_in("dlq");
    assert_eq!(keys.len(), 2);
}

#[tokio::test]
async fn test_redelivery_after_dead_letter_move_is_a_noop() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::failing_after(0));
    let coordinator = coordinator(Arc::clone(&store) as _, Arc::clone(&engine) as _);

    let first = coordinator
        .process(notification("in", "inv1.pdf"), &[])
        .await;
    assert!(first.is_err());
    let mut keys_after_first = store.keys_in("dlq");
    keys_after_first.sort();

    // Same event delivered again
    let second = coordinator
        .process(notification("in", "inv1.pdf"), &[])
        .await
        .unwrap();

    assert!(matches!(second, IngestOutcome::AlreadyHandled));
    let mut keys_after_second = store.keys_in("dlq");
    keys_after_second.sort();
    assert_eq!(keys_after_first, keys_after_second);
    // No second launch happened
    assert_eq!(engine.submit_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_notification_is_logged_and_dropped() {
    let store = Arc::new(InMemoryObjectStore::new());
    let engine = Arc::new(ScriptedEngine::succeeding_after(0));

    let outcome = coordinator(Arc::clone(&store) as _, Arc::clone(&engine) as _)
        .process(notification("in", "../escape.pdf"), &[])
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Rejected { .. }));
    assert_eq!(engine.submit_count.load(Ordering::SeqCst), 0);
    assert_eq!(store.object_count("dlq"), 0);
}

#[tokio::test]
async fn test_unreachable_date_service_escalates_and_dead_letters() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.seed("in", "inv1.pdf", b"pdf bytes");
    let engine = Arc::new(ScriptedEngine::succeeding_after(0));

    let coordinator = ingest_core::orchestration::IngestCoordinator::with_clock(
        test_config(),
        Arc::clone(&store) as _,
        Arc::new(UnreachableNormalizer),
        Arc::clone(&engine) as _,
        Arc::new(ingest_core::clock::ManualClock::new()),
    );

    let err = coordinator
        .process(
            notification("in", "inv1.pdf"),
            &[DateField::new("invoice_date", "2025-07-18")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::TransientService { .. }));
    // The workflow was never launched, and the artifact was dead-lettered
    assert_eq!(engine.submit_count.load(Ordering::SeqCst), 0);
    assert!(!store.exists("in", "inv1.pdf").await.unwrap());
    assert_eq!(store.object_count("dlq"), 2);
}
