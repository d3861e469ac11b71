use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::dates::format_duration;
use super::palette::{dark, light, Tone};
use super::percent::{percentage, round};
use super::raw::{aggregations, buckets, doc_count, first_term, key_string, metric, parse};
use super::shapes::report_drill_down;
use crate::request::ViewOption;
use crate::templates;
use insights_datastore::IndexAlias;
use insights_common::error::InsightsResult;

pub fn template(view: ViewOption) -> &'static str {
    match view {
        ViewOption::TestSuite => templates::TEST_SUITE_OVERVIEW,
        ViewOption::Component => templates::COMPONENT_TEST_OVERVIEW,
        ViewOption::TestCase => templates::TEST_CASE_OVERVIEW,
    }
}

pub fn alias(view: ViewOption) -> IndexAlias {
    match view {
        ViewOption::TestCase => IndexAlias::TestCases,
        _ => IndexAlias::TestSuite,
    }
}

fn failure_rate(pct: i64) -> Value {
    let tone = if pct > 0 { Tone::Failure } else { Tone::Success };
    json!({
        "type": "SINGLE_BAR",
        "value": pct,
        "lightColorScheme": light(tone),
        "darkColorScheme": dark(tone),
    })
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

struct Row {
    fields: Value,
    failure_pct: i64,
    last_run: i64,
}

fn row(view: ViewOption, bucket: &Value) -> Row {
    let key = key_string(bucket);
    let total_runs = doc_count(bucket);
    let failure_pct = percentage(doc_count(&bucket["failed_runs"]) as f64, total_runs as f64);
    let last_run = round(metric(bucket, "last_run"));
    let component_name = first_term(bucket, "component_name").unwrap_or_default();

    let mut fields = match view {
        ViewOption::TestSuite => json!({
            "testSuiteName": key,
            "componentId": first_term(bucket, "component_id").unwrap_or_default(),
            "componentName": component_name,
            "automationId": first_term(bucket, "automation_id").unwrap_or_default(),
            "drillDown": report_drill_down("testSuiteRuns", &key),
        }),
        ViewOption::Component => json!({
            "componentId": key,
            "componentName": component_name,
            "testSuites": round(metric(bucket, "test_suites")),
            "drillDown": report_drill_down("componentTestSuites", &component_name),
        }),
        ViewOption::TestCase => json!({
            "testCaseName": key,
            "testSuiteName": first_term(bucket, "test_suite_name").unwrap_or_default(),
            "componentId": first_term(bucket, "component_id").unwrap_or_default(),
            "componentName": component_name,
            "drillDown": report_drill_down("testCaseRuns", &key),
        }),
    };

    if let Some(map) = fields.as_object_mut() {
        map.insert("lastRun".to_string(), format_millis(last_run).into());
        map.insert("lastRunInMillis".to_string(), last_run.into());
        map.insert("totalRuns".to_string(), total_runs.into());
        map.insert(
            "averageRunTime".to_string(),
            format_duration(round(metric(bucket, "avg_run_time"))).into(),
        );
        map.insert("failureRate".to_string(), failure_rate(failure_pct));
    }

    Row {
        fields,
        failure_pct,
        last_run,
    }
}

/// Overview rows for the selected view: most failing first for suites and
/// components, most recently run first for test cases.
pub fn test_overview(view: ViewOption, raw: &str) -> InsightsResult<Value> {
    let response = parse(raw)?;
    let mut rows: Vec<Row> = buckets(&aggregations(&response)["rows"])
        .iter()
        .map(|b| row(view, b))
        .collect();
    if rows.is_empty() {
        return Ok(Value::Null);
    }

    match view {
        ViewOption::TestCase => rows.sort_by(|a, b| b.last_run.cmp(&a.last_run)),
        _ => rows.sort_by(|a, b| b.failure_pct.cmp(&a.failure_pct)),
    }
    Ok(Value::Array(rows.into_iter().map(|r| r.fields).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: Vec<Value>) -> String {
        json!({"aggregations": {"rows": {"buckets": rows}}}).to_string()
    }

    fn suite(name: &str, runs: i64, failed: i64, last_run: i64) -> Value {
        json!({
            "key": name,
            "doc_count": runs,
            "component_id": {"buckets": [{"key": "c1", "doc_count": runs}]},
            "component_name": {"buckets": [{"key": "api", "doc_count": runs}]},
            "automation_id": {"buckets": [{"key": "a1", "doc_count": runs}]},
            "test_suite_name": {"buckets": [{"key": "smoke", "doc_count": runs}]},
            "last_run": {"value": last_run as f64},
            "avg_run_time": {"value": 150_000.0},
            "failed_runs": {"doc_count": failed}
        })
    }

    #[test]
    fn suites_sort_by_failure_rate() {
        let out = test_overview(
            ViewOption::TestSuite,
            &raw(vec![suite("fast", 10, 1, 2), suite("flaky", 4, 2, 1)]),
        )
        .unwrap();
        assert_eq!(out[0]["testSuiteName"], "flaky");
        assert_eq!(out[0]["failureRate"]["type"], "SINGLE_BAR");
        assert_eq!(out[0]["failureRate"]["value"], 50);
        assert_eq!(out[0]["failureRate"]["lightColorScheme"], json!(["#E83D39", "#F39492"]));
        assert_eq!(out[0]["totalRuns"], 4);
        assert_eq!(out[0]["averageRunTime"], "2m");
        assert_eq!(out[0]["automationId"], "a1");
    }

    #[test]
    fn cases_sort_by_last_run() {
        let out = test_overview(
            ViewOption::TestCase,
            &raw(vec![
                suite("old", 1, 1, 1_704_067_200_000),
                suite("new", 1, 0, 1_704_153_600_000),
            ]),
        )
        .unwrap();
        assert_eq!(out[0]["testCaseName"], "new");
        assert_eq!(out[0]["testSuiteName"], "smoke");
        assert_eq!(out[0]["lastRun"], "2024-01-02 00:00");
        assert_eq!(out[0]["failureRate"]["darkColorScheme"], json!(["#009C5B", "#62CA9D"]));
    }

    #[test]
    fn component_view_reports_suite_count() {
        let mut bucket = suite("c9", 3, 0, 0);
        bucket["test_suites"] = json!({"value": 2});
        let out = test_overview(ViewOption::Component, &raw(vec![bucket])).unwrap();
        assert_eq!(out[0]["componentId"], "c9");
        assert_eq!(out[0]["testSuites"], 2);
        assert_eq!(out[0]["drillDown"]["reportId"], "componentTestSuites");
    }

    #[test]
    fn no_rows_is_null() {
        assert!(test_overview(ViewOption::TestSuite, &raw(vec![])).unwrap().is_null());
    }
}
