//! In-memory spoon ledger.
//!
//! The ledger is the only stateful piece of the tracker: a spoon counter,
//! the running spend total, the queue of pending activities and the count of
//! completed ones. Every operation is synchronous and total; nothing here
//! performs I/O.
//!
//! ## Invariants
//!
//! - `spoons` never goes below zero.
//! - `total_spent` never decreases within a session (only `reset_day` clears it).
//! - Activity ids are never reused by the same ledger.

mod activity;
mod energy;

pub use activity::{parse_cost, Activity, ActivityId, DEFAULT_COST, MAX_COST, MIN_COST};
pub use energy::EnergyLevel;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use activity::{normalize_cost, EXAMPLE_ACTIVITIES};

/// Spoons available at the start of every day.
pub const DAILY_SPOONS: u32 = 12;

/// Counters captured just before a day is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub spoons: u32,
    pub total_spent: u32,
    pub completed_activities: u32,
    pub session_duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    spoons: u32,
    total_spent: u32,
    completed_activities: u32,
    activities: Vec<Activity>,
    session_start: DateTime<Utc>,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Fresh ledger for a session starting now.
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Fresh ledger with an explicit session start.
    pub fn started_at(session_start: DateTime<Utc>) -> Self {
        let mut ledger = Self {
            spoons: DAILY_SPOONS,
            total_spent: 0,
            completed_activities: 0,
            activities: Vec::new(),
            session_start,
            next_id: 1,
        };
        ledger.load_example_activities(session_start);
        ledger
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn spoons(&self) -> u32 {
        self.spoons
    }

    pub fn total_spent(&self) -> u32 {
        self.total_spent
    }

    pub fn completed_activities(&self) -> u32 {
        self.completed_activities
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Whether the activity exists and the current spoons cover its cost.
    pub fn can_afford(&self, id: ActivityId) -> bool {
        self.activity(id).is_some_and(|a| self.spoons >= a.cost)
    }

    pub fn energy_level(&self) -> EnergyLevel {
        EnergyLevel::from_spoons(self.spoons)
    }

    pub fn session_duration_minutes(&self) -> i64 {
        self.session_duration_minutes_at(Utc::now())
    }

    /// Whole minutes elapsed between the session start and `now`.
    /// A clock behind the session start counts as zero.
    pub fn session_duration_minutes_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.session_start).num_minutes().max(0)
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> DaySummary {
        DaySummary {
            spoons: self.spoons,
            total_spent: self.total_spent,
            completed_activities: self.completed_activities,
            session_duration_minutes: self.session_duration_minutes_at(now),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_spoon(&mut self) {
        self.spoons = self.spoons.saturating_add(1);
    }

    /// Spend one spoon. Returns `false` (and changes nothing) when empty.
    pub fn remove_spoon(&mut self) -> bool {
        if self.spoons == 0 {
            return false;
        }
        self.spoons -= 1;
        self.total_spent = self.total_spent.saturating_add(1);
        true
    }

    /// Queue a new activity.
    ///
    /// The name is trimmed. A cost of `0` is treated as "not entered" and
    /// replaced by [`DEFAULT_COST`] before range validation. Affordability is
    /// not checked here.
    pub fn add_activity(&mut self, name: &str, cost: i64) -> Result<&Activity, ValidationError> {
        self.add_activity_at(name, cost, Utc::now())
    }

    pub fn add_activity_at(
        &mut self,
        name: &str,
        cost: i64,
        now: DateTime<Utc>,
    ) -> Result<&Activity, ValidationError> {
        let name = name.trim();
        let cost = normalize_cost(cost);

        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let cost = u32::try_from(cost)
            .ok()
            .filter(|c| (MIN_COST..=MAX_COST).contains(c))
            .ok_or(ValidationError::CostOutOfRange {
                cost,
                min: MIN_COST,
                max: MAX_COST,
            })?;

        let id = self.allocate_id();
        self.activities.push(Activity {
            id,
            name: name.to_string(),
            cost,
            created_at: now,
        });
        let idx = self.activities.len() - 1;
        Ok(&self.activities[idx])
    }

    /// Perform an activity. Succeeds only when it exists and the spoons cover
    /// its cost; otherwise nothing changes.
    pub fn complete_activity(&mut self, id: ActivityId) -> bool {
        self.complete_activity_detailed(id).is_some()
    }

    /// Like [`Ledger::complete_activity`], returning the completed activity.
    pub fn complete_activity_detailed(&mut self, id: ActivityId) -> Option<Activity> {
        let idx = self.activities.iter().position(|a| a.id == id)?;
        let cost = self.activities[idx].cost;
        if self.spoons < cost {
            return None;
        }
        self.spoons -= cost;
        self.total_spent = self.total_spent.saturating_add(cost);
        self.completed_activities = self.completed_activities.saturating_add(1);
        Some(self.activities.remove(idx))
    }

    /// Drop an activity without performing it. Unknown ids are ignored.
    pub fn remove_activity(&mut self, id: ActivityId) -> Option<Activity> {
        let idx = self.activities.iter().position(|a| a.id == id)?;
        Some(self.activities.remove(idx))
    }

    /// Start a new day. Confirmation is the caller's job.
    ///
    /// Returns the counters as they were before the reset.
    pub fn reset_day(&mut self) -> DaySummary {
        self.reset_day_at(Utc::now())
    }

    pub fn reset_day_at(&mut self, now: DateTime<Utc>) -> DaySummary {
        let previous = self.summary_at(now);
        self.spoons = DAILY_SPOONS;
        self.total_spent = 0;
        self.completed_activities = 0;
        self.session_start = now;
        self.load_example_activities(now);
        previous
    }

    fn load_example_activities(&mut self, now: DateTime<Utc>) {
        self.activities.clear();
        for (name, cost) in EXAMPLE_ACTIVITIES {
            let id = self.allocate_id();
            self.activities.push(Activity {
                id,
                name: name.to_string(),
                cost,
                created_at: now,
            });
        }
    }

    fn allocate_id(&mut self) -> ActivityId {
        let id = ActivityId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn drain_to(ledger: &mut Ledger, spoons: u32) {
        while ledger.spoons() > spoons {
            ledger.remove_spoon();
        }
    }

    #[test]
    fn new_ledger_starts_with_daily_spoons_and_examples() {
        let ledger = Ledger::new();
        assert_eq!(ledger.spoons(), 12);
        assert_eq!(ledger.total_spent(), 0);
        assert_eq!(ledger.completed_activities(), 0);
        let ids: Vec<u64> = ledger.activities().iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(ledger.energy_level(), EnergyLevel::Excellent);
    }

    #[test]
    fn remove_spoon_on_empty_is_noop() {
        let mut ledger = Ledger::new();
        drain_to(&mut ledger, 0);
        assert_eq!(ledger.total_spent(), 12);
        assert!(!ledger.remove_spoon());
        assert_eq!(ledger.spoons(), 0);
        assert_eq!(ledger.total_spent(), 12);
    }

    #[test]
    fn add_then_remove_spoon_nets_zero_spoons_but_spends() {
        let mut ledger = Ledger::new();
        ledger.add_spoon();
        assert!(ledger.remove_spoon());
        assert_eq!(ledger.spoons(), 12);
        assert_eq!(ledger.total_spent(), 1);
    }

    #[test]
    fn shower_scenario() {
        let mut ledger = Ledger::new();
        let id = ledger.add_activity("Shower", 2).unwrap().id;
        assert!(ledger.complete_activity(id));
        assert_eq!(ledger.spoons(), 10);
        assert_eq!(ledger.total_spent(), 2);
        assert_eq!(ledger.completed_activities(), 1);
        assert!(ledger.activity(id).is_none());
    }

    #[test]
    fn chores_scenario_insufficient_spoons() {
        let mut ledger = Ledger::new();
        drain_to(&mut ledger, 1);
        let spent_before = ledger.total_spent();
        let id = ledger.add_activity("Chores", 2).unwrap().id;
        assert!(!ledger.can_afford(id));
        assert!(!ledger.complete_activity(id));
        assert_eq!(ledger.spoons(), 1);
        assert_eq!(ledger.total_spent(), spent_before);
        assert_eq!(ledger.completed_activities(), 0);
        assert!(ledger.activity(id).is_some());
    }

    #[test]
    fn add_activity_validation() {
        let mut ledger = Ledger::new();
        let before = ledger.activities().len();

        assert_eq!(ledger.add_activity("", 3).unwrap_err(), ValidationError::EmptyName);
        assert_eq!(ledger.add_activity("   ", 3).unwrap_err(), ValidationError::EmptyName);
        assert!(matches!(
            ledger.add_activity("Task", 11),
            Err(ValidationError::CostOutOfRange { cost: 11, .. })
        ));
        assert!(matches!(
            ledger.add_activity("Task", -4),
            Err(ValidationError::CostOutOfRange { cost: -4, .. })
        ));
        assert_eq!(ledger.activities().len(), before);

        let added = ledger.add_activity("  Task  ", 0).unwrap();
        assert_eq!(added.cost, 1);
        assert_eq!(added.name, "Task");
        assert_eq!(ledger.activities().len(), before + 1);
    }

    #[test]
    fn ids_are_not_reused_after_reset() {
        let mut ledger = Ledger::new();
        let first = ledger.add_activity("Walk", 3).unwrap().id;
        ledger.reset_day();
        let ids: Vec<ActivityId> = ledger.activities().iter().map(|a| a.id).collect();
        assert!(!ids.contains(&first));
        let next = ledger.add_activity("Walk", 3).unwrap().id;
        assert!(next > first);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut ledger = Ledger::new();
        let before = ledger.activities().len();
        assert!(!ledger.complete_activity(ActivityId(999)));
        assert!(ledger.remove_activity(ActivityId(999)).is_none());
        assert_eq!(ledger.activities().len(), before);
        assert_eq!(ledger.spoons(), 12);
    }

    #[test]
    fn remove_activity_does_not_spend() {
        let mut ledger = Ledger::new();
        let removed = ledger.remove_activity(ActivityId(2)).unwrap();
        assert_eq!(removed.name, "Go grocery shopping");
        assert_eq!(ledger.spoons(), 12);
        assert_eq!(ledger.total_spent(), 0);
        assert_eq!(ledger.completed_activities(), 0);
    }

    #[test]
    fn reset_day_restores_initial_state_and_reports_previous() {
        let start = Utc::now() - Duration::minutes(90);
        let mut ledger = Ledger::started_at(start);
        ledger.complete_activity(ActivityId(2));
        ledger.remove_spoon();
        ledger.add_activity("Nap", 1).unwrap();

        let now = start + Duration::minutes(90);
        let previous = ledger.reset_day_at(now);
        assert_eq!(
            previous,
            DaySummary {
                spoons: 7,
                total_spent: 5,
                completed_activities: 1,
                session_duration_minutes: 90,
            }
        );
        assert_eq!(ledger.spoons(), 12);
        assert_eq!(ledger.total_spent(), 0);
        assert_eq!(ledger.completed_activities(), 0);
        assert_eq!(ledger.activities().len(), 4);
        assert_eq!(ledger.session_start(), now);
    }

    #[test]
    fn session_duration_counts_whole_minutes() {
        let start = Utc::now();
        let ledger = Ledger::started_at(start);
        assert_eq!(ledger.session_duration_minutes_at(start + Duration::seconds(59)), 0);
        assert_eq!(ledger.session_duration_minutes_at(start + Duration::seconds(150)), 2);
        assert_eq!(ledger.session_duration_minutes_at(start - Duration::minutes(5)), 0);
    }
}
