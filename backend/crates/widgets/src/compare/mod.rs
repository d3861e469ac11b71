//! Hierarchical comparison reports: one depth-first walk over the organization
//! tree, with the metric's [`Rollup`] deciding how children reduce.

pub mod rollup;
pub mod tree;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

pub use rollup::{
    CountRollup, DistributionRollup, DoraFrequencyRollup, RatioRollup, Rendered, Rollup,
    TimeAverageRollup, TimeBreakdownRollup,
};
pub use tree::{build_organization, OrgComponent, Organization};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry {
    pub title: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_in_millis: Option<i64>,
}

impl SectionEntry {
    pub fn new(title: &str, value: impl Into<Value>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            value_in_millis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub data: Vec<SectionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReports {
    pub id: String,
    pub title: String,
    pub is_sub_org: bool,
    pub components_count: usize,
    pub sub_orgs_count: usize,
    pub section: Section,
    pub total_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_in_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerator: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominator: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_in_days: Option<i64>,
    pub compare_reports: Vec<CompareReports>,
}

impl CompareReports {
    fn from_rendered(
        id: &str,
        title: &str,
        is_sub_org: bool,
        counts: (usize, usize),
        rendered: Rendered,
        children: Vec<CompareReports>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            is_sub_org,
            components_count: counts.0,
            sub_orgs_count: counts.1,
            section: Section {
                data: rendered.section,
            },
            total_value: rendered.total_value,
            value_in_millis: rendered.value_in_millis,
            numerator: rendered.numerator,
            denominator: rendered.denominator,
            difference_in_days: rendered.difference_in_days,
            compare_reports: children,
        }
    }
}

/// Reduce `org` bottom-up. `leaves` holds each component's accumulator;
/// components absent from it contribute the rollup's zero value.
pub fn compare<R: Rollup>(
    rollup: &R,
    org: &Organization,
    leaves: &HashMap<String, R::Acc>,
) -> CompareReports {
    walk(rollup, org, leaves, false).0
}

fn walk<R: Rollup>(
    rollup: &R,
    org: &Organization,
    leaves: &HashMap<String, R::Acc>,
    is_sub_org: bool,
) -> (CompareReports, R::Acc) {
    let mut acc = R::Acc::default();
    let mut children = Vec::with_capacity(org.components.len() + org.sub_orgs.len());

    for component in &org.components {
        let leaf = leaves.get(&component.id).cloned().unwrap_or_default();
        rollup.combine(&mut acc, &leaf);
        children.push(CompareReports::from_rendered(
            &component.id,
            &component.name,
            false,
            (1, 0),
            rollup.render(&leaf),
            Vec::new(),
        ));
    }

    for sub in &org.sub_orgs {
        let (report, sub_acc) = walk(rollup, sub, leaves, true);
        rollup.combine(&mut acc, &sub_acc);
        children.push(report);
    }

    let report = CompareReports::from_rendered(
        &org.id,
        &org.name,
        is_sub_org,
        (org.component_count(), org.sub_org_count()),
        rollup.render(&acc),
        children,
    );
    (report, acc)
}
