//! Integration tests for the tracker's ledger + telemetry wiring.

use serde_json::json;
use spoon_core::{
    ActivityId, EventKind, MemorySink, SessionContext, SpoonTracker, TelemetryError,
    TelemetryEvent, TelemetrySink, ValidationError,
};

/// Sink that always fails, to prove delivery errors never leak into the ledger.
struct Unreachable;

impl TelemetrySink for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn track(&self, _event: &TelemetryEvent) -> Result<(), TelemetryError> {
        Err(TelemetryError::ChannelClosed {
            sink: "unreachable".into(),
        })
    }
}

fn recorded() -> (SpoonTracker, MemorySink) {
    let sink = MemorySink::new();
    (SpoonTracker::new(Box::new(sink.clone())), sink)
}

#[test]
fn test_shower_scenario_emits_added_and_completed() {
    let (mut tracker, sink) = recorded();

    let id = tracker.add_activity("Shower", 2).unwrap();
    assert!(tracker.complete_activity(id));

    let ledger = tracker.ledger();
    assert_eq!(ledger.spoons(), 10);
    assert_eq!(ledger.total_spent(), 2);
    assert_eq!(ledger.completed_activities(), 1);
    assert!(ledger.activity(id).is_none());

    let events = sink.events();
    assert_eq!(
        sink.names(),
        vec![EventKind::ActivityAdded, EventKind::ActivityCompleted]
    );
    assert_eq!(events[0].property("activityName"), Some(&json!("Shower")));
    assert_eq!(events[0].property("totalActivities"), Some(&json!(5)));
    assert_eq!(events[1].property("remainingSpoons"), Some(&json!(10)));
    assert_eq!(events[1].property("totalCompleted"), Some(&json!(1)));
}

#[test]
fn test_no_events_for_noops() {
    let (mut tracker, sink) = recorded();
    for _ in 0..12 {
        tracker.remove_spoon();
    }
    sink.clear();

    tracker.remove_spoon();
    assert!(!tracker.complete_activity(ActivityId(1)));
    assert!(tracker.remove_activity(ActivityId(404)).is_none());
    assert_eq!(
        tracker.add_activity("", 3).unwrap_err(),
        ValidationError::EmptyName
    );

    assert!(sink.events().is_empty());
    assert_eq!(tracker.ledger().spoons(), 0);
}

#[test]
fn test_chores_scenario_insufficient_spoons() {
    let (mut tracker, sink) = recorded();
    for _ in 0..11 {
        tracker.remove_spoon();
    }
    let id = tracker.add_activity("Chores", 2).unwrap();
    assert!(!tracker.complete_activity(id));
    assert_eq!(tracker.ledger().spoons(), 1);
    assert_eq!(tracker.ledger().completed_activities(), 0);
    assert!(!sink.names().contains(&EventKind::ActivityCompleted));
}

#[test]
fn test_spoon_events_carry_counters() {
    let (mut tracker, sink) = recorded();
    tracker.add_spoon();
    tracker.remove_spoon();
    tracker.remove_spoon();

    let events = sink.events();
    assert_eq!(events[0].name, EventKind::SpoonAdded);
    assert_eq!(events[0].property("newCount"), Some(&json!(13)));
    assert_eq!(events[2].name, EventKind::SpoonRemoved);
    assert_eq!(events[2].property("newCount"), Some(&json!(11)));
    assert_eq!(events[2].property("totalSpent"), Some(&json!(2)));
}

#[test]
fn test_remove_activity_event() {
    let (mut tracker, sink) = recorded();
    let removed = tracker.remove_activity(ActivityId(3)).unwrap();
    assert_eq!(removed.name, "Cook a meal");

    let event = sink.events().pop().unwrap();
    assert_eq!(event.name, EventKind::ActivityRemoved);
    assert_eq!(event.property("activityName"), Some(&json!("Cook a meal")));
    assert_eq!(event.property("cost"), Some(&json!(3)));
}

#[test]
fn test_reset_reports_previous_day() {
    let (mut tracker, sink) = recorded();
    tracker.complete_activity(ActivityId(1));
    let previous = tracker.reset_day();
    assert_eq!(previous.spoons, 10);
    assert_eq!(previous.completed_activities, 1);

    let event = sink.events().pop().unwrap();
    assert_eq!(event.name, EventKind::DayReset);
    assert_eq!(event.property("spoons"), Some(&json!(10)));
    assert_eq!(event.property("totalSpent"), Some(&json!(2)));
    assert_eq!(event.property("completedActivities"), Some(&json!(1)));
    assert_eq!(tracker.ledger().spoons(), 12);
}

#[test]
fn test_session_started_and_heartbeat_are_read_only() {
    let (mut tracker, sink) = recorded();
    tracker.start_session(&SessionContext {
        user_agent: "test-agent/1.0".into(),
        language: Some("en_US.UTF-8".into()),
    });
    tracker.remove_spoon();

    let before = tracker.view();
    tracker.heartbeat();
    assert_eq!(tracker.view(), before);

    let events = sink.events();
    assert_eq!(events[0].name, EventKind::SessionStarted);
    assert_eq!(events[0].property("initialSpoons"), Some(&json!(12)));
    assert_eq!(events[0].property("userAgent"), Some(&json!("test-agent/1.0")));

    let beat = events.last().unwrap();
    assert_eq!(beat.name, EventKind::SessionHeartbeat);
    assert_eq!(beat.property("currentSpoons"), Some(&json!(11)));
    assert_eq!(beat.property("totalSpent"), Some(&json!(1)));
    assert_eq!(beat.property("activitiesCount"), Some(&json!(4)));
    assert_eq!(beat.property("sessionDuration"), Some(&json!(0)));
}

#[test]
fn test_failing_sink_does_not_affect_ledger() {
    let mut tracker = SpoonTracker::new(Box::new(Unreachable));
    tracker.add_spoon();
    tracker.remove_spoon();
    let id = tracker.add_activity("Walk", 3).unwrap();
    assert!(tracker.complete_activity(id));
    tracker.heartbeat();

    assert_eq!(tracker.ledger().spoons(), 9);
    assert_eq!(tracker.ledger().total_spent(), 4);
    assert_eq!(tracker.ledger().completed_activities(), 1);
    assert_eq!(tracker.sink_name(), "unreachable");
}
