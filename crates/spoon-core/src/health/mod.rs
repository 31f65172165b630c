//! HTTP health probe for a deployed widget.
//!
//! Fetches the served page once and checks:
//! - the HTTP status is 200,
//! - the page title and structural markup are present (FAIL when missing),
//! - stylesheet, script and telemetry snippet are referenced (WARN when missing),
//! - enough of the element ids the script binds to exist.
//!
//! The outcome is a [`HealthReport`] that can be written as JUnit XML for CI.

mod checks;
mod junit;

pub use checks::{CheckResult, CheckStatus};

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HealthError;
use crate::storage::HealthConfig;

/// Environment variable consulted when no URL is given explicitly.
pub const HEALTH_CHECK_URL_ENV: &str = "HEALTH_CHECK_URL";

pub struct HealthProbe {
    base_url: Url,
    title: String,
    timeout: Duration,
    client: Client,
}

impl HealthProbe {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, title: &str, timeout: Duration) -> Result<Self, HealthError> {
        let invalid = |message: String| HealthError::InvalidUrl {
            url: base_url.to_string(),
            message,
        };
        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spoon-tracker-health/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: url,
            title: title.to_string(),
            timeout,
            client,
        })
    }

    pub fn from_config(base_url: &str, config: &HealthConfig) -> Result<Self, HealthError> {
        Self::new(
            base_url,
            &config.title,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    /// Run every check. Never fails: transport problems become FAIL results.
    pub async fn run(&self) -> HealthReport {
        let started_at = Utc::now();
        tracing::info!(url = %self.base_url, "running health checks");

        let mut results = Vec::new();
        match self.fetch().await {
            Ok((status, body)) => {
                results.push(checks::status_check(status));
                results.extend(checks::body_checks(&body, &self.title));
            }
            Err(e) => {
                let message = if e.is_timeout() {
                    format!("Timeout after {}s", self.timeout.as_secs())
                } else {
                    e.to_string()
                };
                tracing::warn!(url = %self.base_url, error = %e, "health request failed");
                results.push(CheckResult::new("HTTP Response", CheckStatus::Fail, message));
                results.extend(checks::request_failed_checks());
            }
        }

        for result in &results {
            tracing::debug!(check = %result.name, status = %result.status, details = %result.details);
        }

        HealthReport {
            base_url: self.base_url.to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    async fn fetch(&self) -> Result<(u16, String), reqwest::Error> {
        let resp = self.client.get(self.base_url.clone()).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok((status, body))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
}

impl HealthReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    pub fn warnings(&self) -> usize {
        self.count(CheckStatus::Warn)
    }

    /// Healthy means no FAIL; warnings are tolerated.
    pub fn is_healthy(&self) -> bool {
        self.failed() == 0
    }

    pub fn with_status(&self, status: CheckStatus) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.status == status)
    }

    pub fn to_junit_xml(&self) -> String {
        junit::render(self)
    }

    pub fn write_junit(&self, path: &Path) -> Result<(), HealthError> {
        let write_failed = |source| HealthError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }
        std::fs::write(path, self.to_junit_xml()).map_err(write_failed)
    }

    /// Human-readable summary, one line per noteworthy result.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Health Check Summary for {}\n  Passed: {}\n  Failed: {}\n  Warnings: {}\n  Total: {}\n",
            self.base_url,
            self.passed(),
            self.failed(),
            self.warnings(),
            self.results.len()
        );
        for (status, heading) in [(CheckStatus::Fail, "Failed"), (CheckStatus::Warn, "Warnings")] {
            let mut matching = self.with_status(status).peekable();
            if matching.peek().is_none() {
                continue;
            }
            out.push_str(&format!("\n{heading}:\n"));
            for r in matching {
                out.push_str(&format!("  - {}: {}\n", r.name, r.details));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(statuses: &[CheckStatus]) -> HealthReport {
        HealthReport {
            base_url: "http://localhost:8080/".into(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            results: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| CheckResult::new(format!("check {i}"), *s, "details"))
                .collect(),
        }
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            HealthProbe::new("ftp://example.com", "x", Duration::from_secs(1)),
            Err(HealthError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HealthProbe::new("localhost:8080", "x", Duration::from_secs(1)),
            Err(HealthError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn warnings_do_not_make_unhealthy() {
        let r = report(&[CheckStatus::Pass, CheckStatus::Warn, CheckStatus::Warn]);
        assert!(r.is_healthy());
        assert_eq!(r.passed(), 1);
        assert_eq!(r.warnings(), 2);

        let r = report(&[CheckStatus::Pass, CheckStatus::Fail]);
        assert!(!r.is_healthy());
    }

    #[test]
    fn summary_lists_failures() {
        let r = report(&[CheckStatus::Pass, CheckStatus::Fail]);
        let summary = r.summary();
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("  - check 1: details"));
        assert!(!summary.contains("Warnings:\n"));
    }

    #[test]
    fn junit_counts_failures() {
        let r = report(&[CheckStatus::Pass, CheckStatus::Fail, CheckStatus::Warn]);
        let xml = r.to_junit_xml();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("tests=\"3\" failures=\"1\""));
        assert!(xml.contains("<failure message=\"details\">details</failure>"));
        assert!(xml.contains("<system-out>WARN: details</system-out>"));
        assert!(xml.trim_end().ends_with("</testsuite>"));
    }

    #[test]
    fn write_junit_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("health.xml");
        report(&[CheckStatus::Pass]).write_junit(&path).unwrap();
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("<testcase name=\"check 0\" classname=\"HealthCheck\"/>"));
    }
}
