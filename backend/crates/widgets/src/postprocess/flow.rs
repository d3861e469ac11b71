//! Scope-wide flow and DORA widgets. Each reads one `scopedMetrics` response
//! through the same rollup the comparison widget of that metric uses.

use serde_json::{json, Value};

use super::dates::format_duration;
use super::percent::donut_shares;
use super::raw::{aggregations, parse};
use super::shapes::{to_value, url_drill_down, Donut, DonutInfo, DonutSlice, Header};
use super::{raw_response, PostProcessor, Raws};
use crate::compare::rollup::{RatioKind, TimeAcc};
use crate::compare::{
    DistributionRollup, DoraFrequencyRollup, RatioRollup, Rollup, TimeAverageRollup,
    TimeBreakdownRollup,
};
use crate::request::WidgetRequest;
use crate::templates;
use insights_common::error::InsightsResult;

pub const WORKLOAD_KINDS: [(&str, &str); 4] = [
    ("BUG", "Bugs"),
    ("FEATURE", "Feature"),
    ("RISK", "Risk"),
    ("TECH_DEBT", "Tech debt"),
];

pub const CYCLE_STAGES: [(&str, &str); 4] = [
    ("coding", "Coding"),
    ("pickup", "Pickup"),
    ("review", "Review"),
    ("deploy", "Deploy"),
];

pub const DEV_CYCLE_STAGES: [(&str, &str); 3] = [
    ("development", "Development"),
    ("code_review", "Code review"),
    ("testing", "Testing"),
];

fn scoped(raw: &str) -> InsightsResult<Value> {
    let response = parse(raw)?;
    Ok(aggregations(&response).clone())
}

pub fn flow_distribution(raw: &str) -> InsightsResult<Value> {
    let aggs = scoped(raw)?;
    let rollup = DistributionRollup::new(&["kind"], &WORKLOAD_KINDS);
    let counts = rollup.leaf(Some(&aggs), 0);
    if counts.iter().sum::<i64>() == 0 {
        return Ok(Value::Null);
    }
    let shares = donut_shares(&counts);

    let data = WORKLOAD_KINDS
        .iter()
        .zip(&shares)
        .map(|(&(_, title), &value)| DonutSlice {
            name: title.to_string(),
            value,
        })
        .collect();
    let info = WORKLOAD_KINDS
        .iter()
        .zip(&counts)
        .map(|(&(kind, title), &value)| DonutInfo {
            title: title.to_string(),
            value,
            drill_down: url_drill_down(format!("workloadKind={kind}")),
        })
        .collect();
    to_value(&Donut { data, info })
}

/// Mean time to recovery header; no incidents is `null`.
pub fn mttr(raw: &str) -> InsightsResult<Value> {
    let aggs = scoped(raw)?;
    let rollup = TimeAverageRollup::new("Mean time to recovery");
    let acc = rollup.leaf(Some(&aggs), 0);
    if acc.count <= 0.0 {
        return Ok(Value::Null);
    }
    let rendered = rollup.render(&acc);
    let millis = rendered.value_in_millis.unwrap_or(0);
    to_value(&Header::with_millis(format_duration(millis), millis))
}

pub fn deployment_frequency(raw: &str, window_days: i64) -> InsightsResult<Value> {
    let aggs = scoped(raw)?;
    let rollup = DoraFrequencyRollup;
    let rendered = rollup.render(&rollup.leaf(Some(&aggs), window_days));
    Ok(json!({
        "value": rendered.total_value,
        "differenceInDays": rendered.difference_in_days.unwrap_or(window_days),
    }))
}

/// Share of active time over active plus wait time; no tracked time is `null`.
pub fn flow_efficiency(raw: &str) -> InsightsResult<Value> {
    let aggs = scoped(raw)?;
    let rollup = RatioRollup::new("Flow efficiency", RatioKind::FlowEfficiency);
    let acc = rollup.leaf(Some(&aggs), 0);
    if acc.1 <= 0.0 {
        return Ok(Value::Null);
    }
    let pct = rollup.render(&acc).total_value;
    to_value(&Header::new(format!("{pct}%")))
}

/// Cycle-time header and per-stage breakdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleTimeProcessor;

impl CycleTimeProcessor {
    fn rollup() -> TimeBreakdownRollup {
        TimeBreakdownRollup::new(&CYCLE_STAGES)
    }
}

impl PostProcessor for CycleTimeProcessor {
    fn name(&self) -> &'static str {
        "cycleTime"
    }

    fn spec_keys(&self) -> &'static [&'static str] {
        &["cycleTimeHeader", "cycleTimeBreakdown"]
    }

    fn process(&self, spec_key: &str, raws: &Raws, _request: &WidgetRequest) -> InsightsResult<Value> {
        let aggs = scoped(raw_response(raws, templates::SCOPED_METRICS)?)?;
        let rollup = Self::rollup();
        let acc: Vec<TimeAcc> = rollup.leaf(Some(&aggs), 0);
        if acc.iter().all(|s| s.count <= 0.0) {
            return Ok(Value::Null);
        }
        let rendered = rollup.render(&acc);

        match spec_key {
            "cycleTimeHeader" => {
                let millis = rendered.value_in_millis.unwrap_or(0);
                to_value(&Header::with_millis(format_duration(millis), millis))
            }
            _ => Ok(json!({"data": rendered.section})),
        }
    }
}
