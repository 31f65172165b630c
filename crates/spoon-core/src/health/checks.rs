use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Reported, but does not make the deployment unhealthy.
    Warn,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warn => "WARN",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
    pub at: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: CheckStatus, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            details: details.into(),
            at: Utc::now(),
        }
    }
}

/// Markup that must be present; missing means FAIL.
pub(crate) const CONTENT_MARKERS: [(&str, &str); 3] = [
    ("Spoon Counter", "spoon-counter"),
    ("Main Content", "main-content"),
    ("Stats Section", "stats"),
];

/// Referenced assets; missing means WARN.
pub(crate) const RESOURCE_MARKERS: [(&str, &str); 3] = [
    ("CSS", "styles/main.css"),
    ("JavaScript", "scripts/app.js"),
    ("Application Insights", "appinsights"),
];

/// Element ids the widget script binds to.
pub(crate) const SCRIPT_ELEMENT_IDS: [&str; 5] = [
    "spoonCount",
    "spoonVisual",
    "totalSpent",
    "activitiesDone",
    "energyLevel",
];

/// Share of script element ids that must be present.
const SCRIPT_ELEMENT_QUORUM: f64 = 0.8;

pub(crate) fn status_check(status: u16) -> CheckResult {
    let outcome = if status == 200 {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    CheckResult::new("HTTP Response", outcome, format!("Status: {status}"))
}

/// Run every markup check against a page body.
pub(crate) fn body_checks(body: &str, title: &str) -> Vec<CheckResult> {
    let lowered = body.to_lowercase();
    let mut results = Vec::new();

    let title_found = title.trim().is_empty() || lowered.contains(&title.to_lowercase());
    results.push(presence("Content: Title", title_found, CheckStatus::Fail));

    for (name, marker) in CONTENT_MARKERS {
        results.push(presence(
            &format!("Content: {name}"),
            lowered.contains(marker),
            CheckStatus::Fail,
        ));
    }

    for (name, marker) in RESOURCE_MARKERS {
        results.push(presence(
            &format!("Resource: {name}"),
            lowered.contains(marker),
            CheckStatus::Warn,
        ));
    }

    // Ids are case-sensitive in HTML; match the raw body.
    let found = SCRIPT_ELEMENT_IDS
        .iter()
        .filter(|id| body.contains(&format!("id=\"{id}\"")))
        .count();
    let total = SCRIPT_ELEMENT_IDS.len();
    let quorum = found as f64 >= total as f64 * SCRIPT_ELEMENT_QUORUM;
    results.push(if quorum {
        CheckResult::new(
            "JavaScript Elements",
            CheckStatus::Pass,
            format!("{found}/{total} elements found"),
        )
    } else {
        CheckResult::new(
            "JavaScript Elements",
            CheckStatus::Fail,
            format!("Only {found}/{total} elements found"),
        )
    });

    results
}

/// Results for the markup checks when no body could be fetched.
pub(crate) fn request_failed_checks() -> Vec<CheckResult> {
    ["Content Check", "Resources Check", "JavaScript Check"]
        .into_iter()
        .map(|name| CheckResult::new(name, CheckStatus::Fail, "Request failed"))
        .collect()
}

fn presence(name: &str, found: bool, when_missing: CheckStatus) -> CheckResult {
    if found {
        CheckResult::new(name, CheckStatus::Pass, "found")
    } else {
        CheckResult::new(name, when_missing, "not found")
    }
}
