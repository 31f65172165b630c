//! Session heartbeat schedule.
//!
//! Wall-clock based, no internal thread: the caller polls with the current
//! time and emits a heartbeat when [`HeartbeatSchedule::poll`] says one is
//! due. Missed beats (a suspended laptop, a blocked terminal) collapse into a
//! single beat instead of a burst.

use chrono::{DateTime, Duration, Utc};

/// Interval between heartbeats unless configured otherwise.
pub const DEFAULT_HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct HeartbeatSchedule {
    interval: Duration,
    next_due: DateTime<Utc>,
}

impl HeartbeatSchedule {
    /// First beat is due one interval after `start`.
    ///
    /// Intervals are clamped to between one second and one year.
    pub fn new(interval: std::time::Duration, start: DateTime<Utc>) -> Self {
        let interval = Duration::from_std(interval)
            .unwrap_or_else(|_| Duration::days(365))
            .clamp(Duration::seconds(1), Duration::days(365));
        Self {
            interval,
            next_due: start + interval,
        }
    }

    pub fn interval(&self) -> std::time::Duration {
        self.interval
            .to_std()
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL)
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }

    /// Returns `true` if a beat is due at `now`, and schedules the next one.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.next_due {
            return false;
        }
        let step = self.interval.num_milliseconds();
        let missed = (now - self.next_due).num_milliseconds() / step;
        let advance = Duration::milliseconds(step.saturating_mul(missed.saturating_add(1)));
        self.next_due = self
            .next_due
            .checked_add_signed(advance)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        true
    }

    /// Restart the cadence, e.g. after a day reset.
    pub fn restart(&mut self, start: DateTime<Utc>) {
        self.next_due = start + self.interval;
    }
}

impl Default for HeartbeatSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_INTERVAL, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(start: DateTime<Utc>) -> HeartbeatSchedule {
        HeartbeatSchedule::new(DEFAULT_HEARTBEAT_INTERVAL, start)
    }

    #[test]
    fn not_due_before_interval() {
        let start = Utc::now();
        let mut hb = schedule(start);
        assert!(!hb.poll(start));
        assert!(!hb.poll(start + Duration::minutes(4)));
        assert!(hb.poll(start + Duration::minutes(5)));
        assert_eq!(hb.next_due(), start + Duration::minutes(10));
    }

    #[test]
    fn missed_beats_collapse_into_one() {
        let start = Utc::now();
        let mut hb = schedule(start);
        assert!(hb.poll(start + Duration::minutes(23)));
        assert!(!hb.poll(start + Duration::minutes(24)));
        assert_eq!(hb.next_due(), start + Duration::minutes(25));
    }

    #[test]
    fn tiny_interval_is_clamped() {
        let start = Utc::now();
        let hb = HeartbeatSchedule::new(std::time::Duration::from_millis(10), start);
        assert_eq!(hb.interval(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn long_gap_with_short_interval() {
        let start = Utc::now();
        let mut hb = HeartbeatSchedule::new(std::time::Duration::from_secs(1), start);
        let later = start + Duration::days(365);
        assert!(hb.poll(later));
        assert_eq!(hb.next_due(), later + Duration::seconds(1));
        assert!(!hb.poll(later));
    }

    #[test]
    fn restart_moves_next_due() {
        let start = Utc::now();
        let mut hb = schedule(start);
        let later = start + Duration::minutes(3);
        hb.restart(later);
        assert!(!hb.poll(start + Duration::minutes(5)));
        assert!(hb.poll(later + Duration::minutes(5)));
    }
}
