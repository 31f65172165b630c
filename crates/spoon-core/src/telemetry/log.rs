use crate::error::TelemetryError;
use crate::events::TelemetryEvent;

use super::TelemetrySink;

/// Writes each event as a structured `tracing` record under the
/// `spoon::telemetry` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn track(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        let properties = serde_json::to_string(&event.properties)?;
        tracing::info!(
            target: "spoon::telemetry",
            event = event.name.as_str(),
            at = %event.at.to_rfc3339(),
            %properties,
            "Event: {}",
            event.name
        );
        Ok(())
    }
}
