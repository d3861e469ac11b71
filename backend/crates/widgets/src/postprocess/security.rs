use serde::Serialize;
use serde_json::Value;

use super::palette::{severity_title, SEVERITIES};
use super::percent::donut_shares;
use super::raw::{aggregations, doc_count, parse, term_counts};
use super::shapes::{to_value, url_drill_down, Donut, DonutInfo, DonutSlice, SubHeader, SubHeaderItem};
use super::{raw_response, PostProcessor, Raws};
use crate::request::WidgetRequest;
use crate::templates;
use insights_common::error::{InsightsError, InsightsResult};

const CWE_TOP_25: [(&str, &str); 25] = [
    ("CWE-787", "Out-of-bounds Write"),
    ("CWE-79", "Cross-site Scripting"),
    ("CWE-89", "SQL Injection"),
    ("CWE-416", "Use After Free"),
    ("CWE-78", "OS Command Injection"),
    ("CWE-20", "Improper Input Validation"),
    ("CWE-125", "Out-of-bounds Read"),
    ("CWE-22", "Path Traversal"),
    ("CWE-352", "Cross-Site Request Forgery"),
    ("CWE-434", "Unrestricted Upload of File with Dangerous Type"),
    ("CWE-862", "Missing Authorization"),
    ("CWE-476", "NULL Pointer Dereference"),
    ("CWE-287", "Improper Authentication"),
    ("CWE-190", "Integer Overflow or Wraparound"),
    ("CWE-502", "Deserialization of Untrusted Data"),
    ("CWE-77", "Command Injection"),
    ("CWE-119", "Improper Restriction of Operations within the Bounds of a Memory Buffer"),
    ("CWE-798", "Use of Hard-coded Credentials"),
    ("CWE-918", "Server-Side Request Forgery"),
    ("CWE-306", "Missing Authentication for Critical Function"),
    ("CWE-362", "Race Condition"),
    ("CWE-269", "Improper Privilege Management"),
    ("CWE-94", "Code Injection"),
    ("CWE-863", "Incorrect Authorization"),
    ("CWE-276", "Incorrect Default Permissions"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CweRow {
    id: &'static str,
    name: &'static str,
    issues_found: i64,
}

/// Rows for the CWE Top 25 in list order, only weaknesses with findings.
/// No findings at all is [`InsightsError::NoData`].
pub fn cwe_top_25(raw: &str) -> InsightsResult<Value> {
    let response = parse(raw)?;
    let aggs = aggregations(&response);
    if doc_count(&aggs["total"]) == 0 {
        return Err(InsightsError::NoData);
    }

    let per_cwe = &aggs["cwe"]["buckets"];
    let rows: Vec<CweRow> = CWE_TOP_25
        .iter()
        .map(|&(id, name)| CweRow {
            id,
            name,
            issues_found: doc_count(&per_cwe[id]),
        })
        .filter(|row| row.issues_found > 0)
        .collect();
    to_value(&rows)
}

/// Counts per severity in band order; keys are matched case-insensitively.
fn severity_counts(raw: &str) -> InsightsResult<[i64; 4]> {
    let response = parse(raw)?;
    let mut counts = [0i64; 4];
    for (key, n) in term_counts(&aggregations(&response)["severity"]) {
        let upper = key.to_ascii_uppercase();
        if let Some(i) = SEVERITIES.iter().position(|s| *s == upper) {
            counts[i] += n;
        }
    }
    Ok(counts)
}

pub const OPEN_KEY: &str = templates::OPEN_BY_SEVERITY;
pub const REMEDIATED_KEY: &str = templates::REMEDIATED_BY_SEVERITY;

/// `(severity key, title)` in display order, for per-component rollups.
pub const SEVERITY_CATEGORIES: [(&str, &str); 4] = [
    ("VERY_HIGH", "Very high"),
    ("HIGH", "High"),
    ("MEDIUM", "Medium"),
    ("LOW", "Low"),
];

/// Open-vulnerability donut and remediation sub-header from one multi-search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityFindingsProcessor;

impl SecurityFindingsProcessor {
    fn open_donut(&self, raws: &Raws) -> InsightsResult<Value> {
        let counts = severity_counts(raw_response(raws, OPEN_KEY)?)?;
        if counts.iter().sum::<i64>() == 0 {
            return Ok(Value::Null);
        }
        let shares = donut_shares(&counts);

        let data = SEVERITIES
            .iter()
            .zip(&shares)
            .map(|(sev, &value)| DonutSlice {
                name: severity_title(sev).to_string(),
                value,
            })
            .collect();
        let info = SEVERITIES
            .iter()
            .zip(&counts)
            .map(|(sev, &value)| DonutInfo {
                title: severity_title(sev).to_string(),
                value,
                drill_down: url_drill_down(format!(
                    "severities={sev}&remediationStatus=OPEN+IN_PROGRESS"
                )),
            })
            .collect();
        to_value(&Donut { data, info })
    }

    fn remediation(&self, raws: &Raws) -> InsightsResult<Value> {
        let remediated = severity_counts(raw_response(raws, REMEDIATED_KEY)?)?;
        let open = severity_counts(raw_response(raws, OPEN_KEY)?)?;
        if remediated.iter().chain(&open).all(|&n| n == 0) {
            return Ok(Value::Null);
        }

        let sub_header = SEVERITIES
            .iter()
            .zip(remediated.iter().zip(&open))
            .map(|(sev, (&fixed, &still_open))| SubHeaderItem {
                title: severity_title(sev).to_string(),
                value: fixed.into(),
                drill_down: Some(url_drill_down(format!(
                    "severities={sev}&remediationStatus=CLOSED&open={still_open}"
                ))),
            })
            .collect();
        to_value(&SubHeader { sub_header })
    }
}

impl PostProcessor for SecurityFindingsProcessor {
    fn name(&self) -> &'static str {
        "securityFindings"
    }

    fn spec_keys(&self) -> &'static [&'static str] {
        &["openVulnerabilitiesDonut", "vulnerabilityRemediation"]
    }

    fn process(&self, spec_key: &str, raws: &Raws, _request: &WidgetRequest) -> InsightsResult<Value> {
        match spec_key {
            "openVulnerabilitiesDonut" => self.open_donut(raws),
            _ => self.remediation(raws),
        }
    }
}
