//! Ledger plus telemetry.
//!
//! [`SpoonTracker`] is what a front-end holds: it forwards each command to
//! the [`Ledger`] and, when the ledger actually changed, reports the matching
//! [`TelemetryEvent`] to its sink. Sink failures are logged and dropped.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::events::{EventKind, SessionContext, TelemetryEvent};
use crate::ledger::{Activity, ActivityId, DaySummary, Ledger};
use crate::presenter::LedgerView;
use crate::telemetry::TelemetrySink;

pub struct SpoonTracker {
    ledger: Ledger,
    sink: Box<dyn TelemetrySink>,
    session_id: Uuid,
}

impl SpoonTracker {
    pub fn new(sink: Box<dyn TelemetrySink>) -> Self {
        Self::with_ledger(Ledger::new(), sink)
    }

    pub fn with_ledger(ledger: Ledger, sink: Box<dyn TelemetrySink>) -> Self {
        Self {
            ledger,
            sink,
            session_id: Uuid::new_v4(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn view(&self) -> LedgerView {
        LedgerView::from_ledger(&self.ledger)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Announce the session. Call once after construction.
    pub fn start_session(&self, context: &SessionContext) {
        let event = self
            .event(EventKind::SessionStarted)
            .with("initialSpoons", self.ledger.spoons())
            .with("userAgent", context.user_agent.as_str())
            .with("language", context.language.clone());
        self.emit(event);
    }

    pub fn add_spoon(&mut self) {
        self.ledger.add_spoon();
        let event = self
            .event(EventKind::SpoonAdded)
            .with("newCount", self.ledger.spoons());
        self.emit(event);
    }

    /// Spend one spoon; silently ignored when none are left.
    pub fn remove_spoon(&mut self) {
        if !self.ledger.remove_spoon() {
            tracing::debug!("remove_spoon ignored: no spoons left");
            return;
        }
        let event = self
            .event(EventKind::SpoonRemoved)
            .with("newCount", self.ledger.spoons())
            .with("totalSpent", self.ledger.total_spent());
        self.emit(event);
    }

    pub fn add_activity(&mut self, name: &str, cost: i64) -> Result<ActivityId, ValidationError> {
        let (id, name, cost) = {
            let activity = self.ledger.add_activity(name, cost)?;
            (activity.id, activity.name.clone(), activity.cost)
        };
        let event = self
            .event(EventKind::ActivityAdded)
            .with("activityName", name)
            .with("cost", cost)
            .with("totalActivities", self.ledger.activities().len());
        self.emit(event);
        Ok(id)
    }

    /// Returns `false` for unknown ids and unaffordable activities.
    pub fn complete_activity(&mut self, id: ActivityId) -> bool {
        let Some(activity) = self.ledger.complete_activity_detailed(id) else {
            tracing::debug!(%id, "complete_activity refused");
            return false;
        };
        let event = self
            .event(EventKind::ActivityCompleted)
            .with("activityName", activity.name)
            .with("cost", activity.cost)
            .with("remainingSpoons", self.ledger.spoons())
            .with("totalCompleted", self.ledger.completed_activities());
        self.emit(event);
        true
    }

    pub fn remove_activity(&mut self, id: ActivityId) -> Option<Activity> {
        let activity = self.ledger.remove_activity(id)?;
        let event = self
            .event(EventKind::ActivityRemoved)
            .with("activityName", activity.name.as_str())
            .with("cost", activity.cost);
        self.emit(event);
        Some(activity)
    }

    /// Start a new day. The caller must have obtained user confirmation.
    pub fn reset_day(&mut self) -> DaySummary {
        let previous = self.ledger.reset_day();
        let event = self
            .event(EventKind::DayReset)
            .with("spoons", previous.spoons)
            .with("totalSpent", previous.total_spent)
            .with("completedActivities", previous.completed_activities)
            .with("sessionDuration", previous.session_duration_minutes);
        self.emit(event);
        previous
    }

    /// Report current state. Never mutates the ledger.
    pub fn heartbeat(&self) {
        let event = self
            .event(EventKind::SessionHeartbeat)
            .with("currentSpoons", self.ledger.spoons())
            .with("totalSpent", self.ledger.total_spent())
            .with("activitiesCount", self.ledger.activities().len());
        self.emit(event);
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Base event with the session-wide properties every event carries.
    fn event(&self, kind: EventKind) -> TelemetryEvent {
        let now = Utc::now();
        self.event_at(kind, now)
    }

    fn event_at(&self, kind: EventKind, now: DateTime<Utc>) -> TelemetryEvent {
        TelemetryEvent::new(kind, now)
            .with("sessionDuration", self.ledger.session_duration_minutes_at(now))
            .with("sessionId", self.session_id.to_string())
            .with("timestamp", now.to_rfc3339())
    }

    fn emit(&self, event: TelemetryEvent) {
        tracing::debug!(event = event.name.as_str(), sink = self.sink.name(), "tracking event");
        if let Err(e) = self.sink.track(&event) {
            tracing::warn!(
                event = event.name.as_str(),
                sink = self.sink.name(),
                error = %e,
                "telemetry delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::MemorySink;

    fn tracker() -> (SpoonTracker, MemorySink) {
        let sink = MemorySink::new();
        (SpoonTracker::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn every_event_carries_session_properties() {
        let (mut tracker, sink) = tracker();
        tracker.add_spoon();
        let event = &sink.events()[0];
        assert!(event.property("sessionDuration").is_some());
        assert!(event.property("timestamp").is_some());
        assert_eq!(
            event.property("sessionId").and_then(|v| v.as_str()),
            Some(tracker.session_id().to_string().as_str())
        );
    }

    #[test]
    fn day_reset_overrides_duration_with_previous_session() {
        let (mut tracker, sink) = tracker();
        tracker.remove_spoon();
        tracker.reset_day();
        let reset = sink.events().pop().unwrap();
        assert_eq!(reset.name, EventKind::DayReset);
        assert_eq!(reset.property("spoons"), Some(&serde_json::json!(11)));
        assert_eq!(reset.property("totalSpent"), Some(&serde_json::json!(1)));
    }
}
