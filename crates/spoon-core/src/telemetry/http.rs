//! Fire-and-forget HTTP telemetry.
//!
//! `track` only enqueues; a background task owns the HTTP client and posts
//! events one by one. When every `HttpSink` handle is dropped the task drains
//! the queue and finishes, returning its [`DeliveryStats`].

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::TelemetryError;
use crate::events::TelemetryEvent;

use super::TelemetrySink;

/// Header carrying the instrumentation key, when one is configured.
pub const INSTRUMENTATION_KEY_HEADER: &str = "X-Instrumentation-Key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome counters of the delivery task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub failed: u64,
}

pub struct HttpSink {
    tx: mpsc::UnboundedSender<TelemetryEvent>,
}

impl HttpSink {
    /// Start the delivery task on the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn spawn(
        endpoint: &str,
        instrumentation_key: Option<String>,
    ) -> Result<(Self, JoinHandle<DeliveryStats>), TelemetryError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| TelemetryError::InvalidConfig(format!("endpoint '{endpoint}': {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TelemetryError::InvalidConfig(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(deliver(client, endpoint, instrumentation_key, rx));
        Ok((Self { tx }, handle))
    }
}

impl TelemetrySink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    fn track(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        self.tx
            .send(event.clone())
            .map_err(|_| TelemetryError::ChannelClosed {
                sink: self.name().to_string(),
            })
    }
}

async fn deliver(
    client: Client,
    endpoint: Url,
    instrumentation_key: Option<String>,
    mut rx: mpsc::UnboundedReceiver<TelemetryEvent>,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();

    while let Some(event) = rx.recv().await {
        let body = envelope(&event, instrumentation_key.as_deref());
        let mut request = client.post(endpoint.clone()).json(&body);
        if let Some(key) = instrumentation_key.as_deref() {
            request = request.header(INSTRUMENTATION_KEY_HEADER, key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => stats.delivered += 1,
            Ok(resp) => {
                stats.failed += 1;
                tracing::warn!(
                    event = event.name.as_str(),
                    status = resp.status().as_u16(),
                    "telemetry endpoint rejected event"
                );
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(event = event.name.as_str(), error = %e, "telemetry delivery failed");
            }
        }
    }

    tracing::debug!(
        delivered = stats.delivered,
        failed = stats.failed,
        "telemetry delivery task finished"
    );
    stats
}

fn envelope(event: &TelemetryEvent, instrumentation_key: Option<&str>) -> serde_json::Value {
    json!({
        "name": event.name.as_str(),
        "time": event.at.to_rfc3339(),
        "iKey": instrumentation_key,
        "data": {
            "properties": event.properties,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use chrono::Utc;

    #[test]
    fn envelope_carries_name_and_properties() {
        let event = TelemetryEvent::new(EventKind::ActivityAdded, Utc::now())
            .with("activityName", "Walk")
            .with("cost", 3);
        let body = envelope(&event, Some("abc"));
        assert_eq!(body["name"], "ActivityAdded");
        assert_eq!(body["iKey"], "abc");
        assert_eq!(body["data"]["properties"]["activityName"], "Walk");
        assert_eq!(body["data"]["properties"]["cost"], 3);
    }

    #[tokio::test]
    async fn spawn_rejects_non_http_endpoint() {
        assert!(matches!(
            HttpSink::spawn("ftp://example.com/track", None),
            Err(TelemetryError::InvalidConfig(_))
        ));
        assert!(matches!(
            HttpSink::spawn("not a url", None),
            Err(TelemetryError::InvalidConfig(_))
        ));
    }
}
