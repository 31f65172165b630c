//! JUnit XML rendering for CI dashboards.

use super::checks::CheckStatus;
use super::HealthReport;

pub(crate) const SUITE_NAME: &str = "HealthCheck";

pub(crate) fn render(report: &HealthReport) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuite name=\"{SUITE_NAME}\" tests=\"{}\" failures=\"{}\" timestamp=\"{}\">\n",
        report.results.len(),
        report.failed(),
        escape(&report.finished_at.to_rfc3339()),
    ));

    for result in &report.results {
        let name = escape(&result.name);
        match result.status {
            CheckStatus::Pass => {
                xml.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"{SUITE_NAME}\"/>\n"
                ));
            }
            CheckStatus::Fail => {
                let details = escape(&result.details);
                xml.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"{SUITE_NAME}\">\n    <failure message=\"{details}\">{details}</failure>\n  </testcase>\n"
                ));
            }
            CheckStatus::Warn => {
                let details = escape(&result.details);
                xml.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"{SUITE_NAME}\">\n    <system-out>WARN: {details}</system-out>\n  </testcase>\n"
                ));
            }
        }
    }

    xml.push_str("</testsuite>\n");
    xml
}

/// Escape text for use in XML attributes and character data.
pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }
}
