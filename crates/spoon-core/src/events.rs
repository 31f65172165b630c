use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Every telemetry event the tracker can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SpoonAdded,
    SpoonRemoved,
    ActivityAdded,
    ActivityCompleted,
    ActivityRemoved,
    DayReset,
    SessionStarted,
    SessionHeartbeat,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SpoonAdded => "SpoonAdded",
            EventKind::SpoonRemoved => "SpoonRemoved",
            EventKind::ActivityAdded => "ActivityAdded",
            EventKind::ActivityCompleted => "ActivityCompleted",
            EventKind::ActivityRemoved => "ActivityRemoved",
            EventKind::DayReset => "DayReset",
            EventKind::SessionStarted => "SessionStarted",
            EventKind::SessionHeartbeat => "SessionHeartbeat",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named event with a flat property map, ready for any sink.
///
/// Property keys are camelCase to match what dashboards built on the web
/// widget already query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: EventKind,
    pub properties: Map<String, Value>,
    pub at: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(name: EventKind, at: DateTime<Utc>) -> Self {
        Self {
            name,
            properties: Map::new(),
            at,
        }
    }

    /// Builder-style property insertion.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Describes the client a session runs in, reported with `SessionStarted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_agent: String,
    pub language: Option<String>,
}

impl SessionContext {
    /// Context for this build, with the language taken from `LANG`.
    pub fn from_env() -> Self {
        Self {
            user_agent: format!("spoon-tracker/{}", env!("CARGO_PKG_VERSION")),
            language: std::env::var("LANG").ok().filter(|l| !l.is_empty()),
        }
    }
}
