use serde_json::Value;

use super::palette::{dark, light, Tone};
use super::percent::round;
use super::raw::{aggregations, buckets, doc_count, key_millis, metric, parse, term_count};
use super::series::{assemble, AxisFormatter, SeriesSpec};
use super::shapes::{report_drill_down, to_value, Header, SubHeader, SubHeaderItem};
use super::{raw_response, PostProcessor, Raws};
use crate::request::WidgetRequest;
use crate::templates;
use insights_common::error::{InsightsError, InsightsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Commits,
    WorkflowRuns,
    Builds,
    Deployments,
    PullRequests,
}

impl ActivityKind {
    pub fn handler_name(&self) -> &'static str {
        match self {
            ActivityKind::Commits => "commitTrends",
            ActivityKind::WorkflowRuns => "workflowRuns",
            ActivityKind::Builds => "builds",
            ActivityKind::Deployments => "deployments",
            ActivityKind::PullRequests => "pullRequests",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            ActivityKind::Commits => templates::COMMIT_TRENDS,
            ActivityKind::WorkflowRuns => templates::WORKFLOW_RUNS,
            ActivityKind::Builds => templates::BUILDS,
            ActivityKind::Deployments => templates::DEPLOYMENTS,
            ActivityKind::PullRequests => templates::PULL_REQUESTS,
        }
    }

    fn spec_keys(&self) -> &'static [&'static str] {
        match self {
            ActivityKind::Commits => &[
                "commitTrendsHeader",
                "commitTrendsSubHeader",
                "commitTrendsChart",
            ],
            ActivityKind::WorkflowRuns => &["workflowRunsHeader", "workflowRunsChart"],
            ActivityKind::Builds => &["buildsHeader", "buildsChart", "buildDurationChart"],
            ActivityKind::Deployments => &["deploymentsHeader", "deploymentsChart"],
            ActivityKind::PullRequests => &["pullRequestsHeader", "pullRequestsChart"],
        }
    }

    fn count_agg(&self) -> &'static str {
        match self {
            ActivityKind::Commits => "commits_count",
            ActivityKind::WorkflowRuns => "runs_count",
            ActivityKind::Builds => "builds_count",
            ActivityKind::Deployments => "deployments_count",
            ActivityKind::PullRequests => "pull_requests_count",
        }
    }

    fn histogram_agg(&self) -> &'static str {
        match self {
            ActivityKind::Commits => "commits_over_time",
            ActivityKind::WorkflowRuns => "runs_over_time",
            ActivityKind::Builds => "builds_over_time",
            ActivityKind::Deployments => "deployments_over_time",
            ActivityKind::PullRequests => "pull_requests_over_time",
        }
    }
}

pub const PR_STATUSES: [(&str, &str); 4] = [
    ("APPROVED", "Approved"),
    ("CHANGES_REQUESTED", "Changes requested"),
    ("OPEN", "Open"),
    ("REJECTED", "Rejected"),
];

/// Headers, sub-headers and charts of the activity widgets.
#[derive(Debug, Clone, Copy)]
pub struct ActivityProcessor {
    kind: ActivityKind,
}

impl ActivityProcessor {
    pub fn new(kind: ActivityKind) -> Self {
        Self { kind }
    }

    fn header(&self, aggs: &Value) -> InsightsResult<Value> {
        to_value(&Header::new(round(metric(aggs, self.kind.count_agg()))))
    }

    fn commit_sub_header(&self, aggs: &Value) -> InsightsResult<Value> {
        let authors = round(metric(aggs, "unique_authors"));
        let per_author = if authors > 0 {
            (metric(aggs, "avg_weekly_commits") / authors as f64).trunc() as i64
        } else {
            0
        };
        to_value(&SubHeader {
            sub_header: vec![
                SubHeaderItem {
                    title: "Active developers".to_string(),
                    value: authors.into(),
                    drill_down: Some(report_drill_down("activeDevelopers", "Active developers")),
                },
                SubHeaderItem {
                    title: "Weekly commits/active devs".to_string(),
                    value: per_author.into(),
                    drill_down: None,
                },
            ],
        })
    }

    fn chart(&self, spec_key: &str, aggs: &Value, request: &WidgetRequest) -> InsightsResult<Value> {
        let histogram = buckets(&aggs[self.kind.histogram_agg()]);
        if histogram.is_empty() {
            return Ok(Value::Null);
        }
        let keys: Vec<i64> = histogram.iter().map(key_millis).collect();
        let column = |f: &dyn Fn(&Value) -> i64| histogram.iter().map(f).collect::<Vec<_>>();

        let specs = match (self.kind, spec_key) {
            (ActivityKind::Commits, _) => vec![SeriesSpec::new("Commits", column(&doc_count))
                .formatter(AxisFormatter::AppendUnit("commits"))],
            (ActivityKind::WorkflowRuns, _) => vec![
                SeriesSpec::new(
                    "Successful runs",
                    column(&|b| term_count(&b["status"], "SUCCESS")),
                )
                .colors(light(Tone::Success), dark(Tone::Success)),
                SeriesSpec::new(
                    "Failed runs",
                    column(&|b| term_count(&b["status"], "FAILURE")),
                )
                .colors(light(Tone::Failure), dark(Tone::Failure)),
            ],
            (ActivityKind::Builds, "buildDurationChart") => vec![SeriesSpec::new(
                "Average duration",
                column(&|b| round(metric(b, "avg_duration"))),
            )
            .time_duration()],
            (ActivityKind::Builds, _) => vec![SeriesSpec::new("Builds", column(&doc_count))],
            (ActivityKind::Deployments, _) => {
                vec![SeriesSpec::new("Deployments", column(&doc_count))
                    .formatter(AxisFormatter::AppendText("deployments"))]
            }
            (ActivityKind::PullRequests, _) => PR_STATUSES
                .iter()
                .map(|&(key, title)| {
                    SeriesSpec::new(title, column(&|b| term_count(&b["status"], key)))
                })
                .collect(),
        };

        to_value(&assemble(request, &keys, specs))
    }
}

impl PostProcessor for ActivityProcessor {
    fn name(&self) -> &'static str {
        self.kind.handler_name()
    }

    fn spec_keys(&self) -> &'static [&'static str] {
        self.kind.spec_keys()
    }

    fn process(&self, spec_key: &str, raws: &Raws, request: &WidgetRequest) -> InsightsResult<Value> {
        let response = parse(raw_response(raws, self.kind.template())?)?;
        let aggs = aggregations(&response);
        if aggs.is_null() {
            return Ok(Value::Null);
        }

        if spec_key.ends_with("SubHeader") {
            return match self.kind {
                ActivityKind::Commits => self.commit_sub_header(aggs),
                _ => Err(InsightsError::PostProcessNotFound(spec_key.to_string())),
            };
        }
        if spec_key.ends_with("Header") {
            return self.header(aggs);
        }
        self.chart(spec_key, aggs, request)
    }
}
