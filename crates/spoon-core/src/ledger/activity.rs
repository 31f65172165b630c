use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted activity cost.
pub const MIN_COST: u32 = 1;
/// Largest accepted activity cost.
pub const MAX_COST: u32 = 10;
/// Cost used when the input carries no usable number.
pub const DEFAULT_COST: i64 = 1;

/// Ledger-unique activity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ActivityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(ActivityId)
    }
}

/// A pending task with an energy cost. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub cost: u32,
    pub created_at: DateTime<Utc>,
}

/// The example activities every fresh day starts with.
pub(crate) const EXAMPLE_ACTIVITIES: [(&str, u32); 4] = [
    ("Take a shower", 2),
    ("Go grocery shopping", 4),
    ("Cook a meal", 3),
    ("Answer emails", 2),
];

/// Parse a free-text cost the way a form field would.
///
/// Leading whitespace and an optional sign are accepted, followed by as many
/// digits as are present; trailing garbage is ignored. Input with no digits,
/// or a value of zero, falls back to [`DEFAULT_COST`]. Values too large for
/// `i64` saturate and are later rejected by range validation.
pub fn parse_cost(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return DEFAULT_COST;
    }
    let value = if negative { -value } else { value };
    normalize_cost(value)
}

/// Zero means "nothing entered"; substitute the default.
pub(crate) fn normalize_cost(cost: i64) -> i64 {
    if cost == 0 {
        DEFAULT_COST
    } else {
        cost
    }
}
