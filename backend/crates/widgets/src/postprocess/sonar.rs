use serde::Serialize;
use serde_json::Value;

use super::percent::round;
use super::raw::{hit_sources, parse};
use super::shapes::{to_value, url_drill_down, Header, SubHeader, SubHeaderItem};
use insights_common::error::InsightsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SonarKind {
    IssueTypes,
    IssueTypesSection,
    Coverage,
    Duplication,
}

impl SonarKind {
    pub fn handler_name(&self) -> &'static str {
        match self {
            SonarKind::IssueTypes => "sonarIssueTypes",
            SonarKind::IssueTypesSection => "sonarIssueTypesSection",
            SonarKind::Coverage => "sonarCoverage",
            SonarKind::Duplication => "sonarDuplication",
        }
    }

    /// Number of latest reports the widget reads.
    pub fn report_count(&self) -> i64 {
        match self {
            SonarKind::IssueTypesSection => 2,
            _ => 1,
        }
    }
}

const ISSUE_TYPES: [(&str, &str, &str); 4] = [
    ("code_smell", "CODE_SMELL", "Code smells"),
    ("bug", "BUG", "Bugs"),
    ("vulnerability", "VULNERABILITY", "Vulnerabilities"),
    ("security_hotspot", "SECURITY_HOTSPOT", "Security hotspots"),
];

/// Issues of one report per issue type, matched by code prefix.
fn issue_counts(report: &Value) -> [i64; 4] {
    let mut counts = [0i64; 4];
    let files = report["files"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    for issue in files
        .iter()
        .filter_map(|f| f["issues"].as_array())
        .flatten()
    {
        let code = issue["code"].as_str().unwrap_or_default().to_ascii_lowercase();
        if let Some(i) = ISSUE_TYPES
            .iter()
            .position(|(prefix, _, _)| code.starts_with(prefix))
        {
            counts[i] += 1;
        }
    }
    counts
}

#[derive(Debug, Serialize)]
struct SectionRow {
    title: &'static str,
    current: i64,
    previous: i64,
}

fn percent_header(report: &Value, field: &str) -> InsightsResult<Value> {
    let pct = round(report[field].as_f64().unwrap_or(0.0));
    to_value(&Header::new(format!("{pct}%")))
}

/// Shape the latest scan report(s); no report at all is `null`.
pub fn sonar(kind: SonarKind, raw: &str) -> InsightsResult<Value> {
    let reports = hit_sources(&parse(raw)?);
    let Some(latest) = reports.first() else {
        return Ok(Value::Null);
    };

    match kind {
        SonarKind::IssueTypes => {
            let counts = issue_counts(latest);
            let sub_header = ISSUE_TYPES
                .iter()
                .zip(counts)
                .map(|(&(_, issue_type, title), n)| SubHeaderItem {
                    title: title.to_string(),
                    value: n.into(),
                    drill_down: Some(url_drill_down(format!("issueType={issue_type}"))),
                })
                .collect();
            to_value(&SubHeader { sub_header })
        }
        SonarKind::IssueTypesSection => {
            let current = issue_counts(latest);
            let previous = reports.get(1).map(issue_counts).unwrap_or_default();
            let rows: Vec<SectionRow> = ISSUE_TYPES
                .iter()
                .enumerate()
                .map(|(i, &(_, _, title))| SectionRow {
                    title,
                    current: current[i],
                    previous: previous[i],
                })
                .collect();
            to_value(&rows)
        }
        SonarKind::Coverage => percent_header(latest, "coverage"),
        SonarKind::Duplication => percent_header(latest, "duplicated_lines_density"),
    }
}
