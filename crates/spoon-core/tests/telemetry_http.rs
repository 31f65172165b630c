//! E2E tests for fire-and-forget HTTP telemetry.

use mockito::Matcher;
use serde_json::json;
use spoon_core::telemetry::DeliveryStats;
use spoon_core::{HttpSink, SpoonTracker};

/// Test: tracker events reach the ingestion endpoint with the key header.
#[tokio::test]
async fn test_events_are_posted() {
    let mut server = mockito::Server::new_async().await;
    let added = server
        .mock("POST", "/track")
        .match_header("x-instrumentation-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "name": "SpoonAdded",
            "iKey": "test-key",
            "data": { "properties": { "newCount": 13 } }
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let removed = server
        .mock("POST", "/track")
        .match_body(Matcher::PartialJson(json!({ "name": "SpoonRemoved" })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let (sink, delivery) =
        HttpSink::spawn(&format!("{}/track", server.url()), Some("test-key".into())).unwrap();
    let mut tracker = SpoonTracker::new(Box::new(sink));
    tracker.add_spoon();
    tracker.remove_spoon();
    drop(tracker);

    let stats = delivery.await.unwrap();
    assert_eq!(
        stats,
        DeliveryStats {
            delivered: 2,
            failed: 0
        }
    );
    added.assert_async().await;
    removed.assert_async().await;
}

/// Test: endpoint failures are counted, never surfaced to the tracker.
#[tokio::test]
async fn test_rejected_events_are_counted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/track")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let (sink, delivery) = HttpSink::spawn(&format!("{}/track", server.url()), None).unwrap();
    let mut tracker = SpoonTracker::new(Box::new(sink));
    tracker.add_spoon();
    let id = tracker.add_activity("Walk", 2).unwrap();
    assert!(tracker.complete_activity(id));
    assert_eq!(tracker.ledger().spoons(), 11);
    drop(tracker);

    let stats = delivery.await.unwrap();
    assert_eq!(stats.delivered, 0);
    assert_eq!(stats.failed, 3);
}
