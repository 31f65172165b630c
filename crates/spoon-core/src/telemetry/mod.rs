//! Telemetry sinks.
//!
//! The tracker reports every state change as a [`TelemetryEvent`] through an
//! injected [`TelemetrySink`]. Delivery is best effort: sinks may fail, and
//! the tracker only logs those failures.

mod file;
mod http;
mod log;

pub use file::JsonLinesSink;
pub use http::{DeliveryStats, HttpSink};
pub use log::LogSink;

use std::sync::{Arc, Mutex};

use crate::error::TelemetryError;
use crate::events::{EventKind, TelemetryEvent};

/// A destination for telemetry events.
///
/// Implementations must not block for long: `track` is called inline from
/// ledger operations.
pub trait TelemetrySink: Send + Sync {
    /// Short identifier used in logs (e.g. "log", "http").
    fn name(&self) -> &str;

    /// Deliver (or enqueue) one event.
    fn track(&self, event: &TelemetryEvent) -> Result<(), TelemetryError>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn track(&self, _event: &TelemetryEvent) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Keeps events in memory. Clones share the same buffer, so a test can hand
/// one clone to the tracker and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<EventKind> {
        self.events().iter().map(|e| e.name).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl TelemetrySink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn track(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}

/// Delivers to every inner sink, even when one of them fails.
/// The first failure is returned after all sinks were tried.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn TelemetrySink>>,
}

impl FanOutSink {
    pub fn new(sinks: Vec<Box<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn TelemetrySink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TelemetrySink for FanOutSink {
    fn name(&self) -> &str {
        "fan-out"
    }

    fn track(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.track(event) {
                tracing::debug!(sink = sink.name(), error = %e, "fan-out delivery failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
