use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use insights_common::error::{InsightsError, InsightsResult};

/// Sentinel meaning "every component of the org".
pub const ALL_COMPONENTS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn calendar_interval(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Week,
    Month,
    Year,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewOption {
    TestSuite,
    Component,
    TestCase,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComponentScope {
    #[default]
    All,
    Only(Vec<String>),
}

impl ComponentScope {
    pub fn from_list(ids: Vec<String>) -> Self {
        if ids.is_empty() || ids.iter().any(|id| id == ALL_COMPONENTS) {
            ComponentScope::All
        } else {
            ComponentScope::Only(ids)
        }
    }

    /// Explicit component ids, or `None` when the scope is unrestricted.
    pub fn ids(&self) -> Option<&[String]> {
        match self {
            ComponentScope::All => None,
            ComponentScope::Only(ids) => Some(ids),
        }
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            ComponentScope::All => true,
            ComponentScope::Only(ids) => ids.iter().any(|c| c == id),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScope {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ComponentScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = match Option::<RawScope>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(RawScope::One(id)) => vec![id],
            Some(RawScope::Many(ids)) => ids,
        };
        Ok(ComponentScope::from_list(ids))
    }
}

impl Serialize for ComponentScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ComponentScope::All => serializer.serialize_str(ALL_COMPONENTS),
            ComponentScope::Only(ids) => ids.serialize(serializer),
        }
    }
}

/// Parameters of a single dashboard widget query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRequest {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub sub_org_id: Option<String>,
    #[serde(default)]
    pub components: ComponentScope,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default)]
    pub aggregation: Option<Granularity>,
    #[serde(default)]
    pub duration_type: Option<DurationType>,
    #[serde(default)]
    pub view_option: Option<ViewOption>,
    #[serde(default)]
    pub normalized_start: Option<String>,
    #[serde(default)]
    pub flags: HashMap<String, String>,
}

impl WidgetRequest {
    /// Tenant the queries run against: a distinct sub-org overrides the org.
    pub fn effective_org_id(&self) -> InsightsResult<&str> {
        if let Some(sub) = self.sub_org_id.as_deref() {
            if !sub.is_empty() && sub != self.org_id {
                return Ok(sub);
            }
        }
        if self.org_id.trim().is_empty() {
            return Err(InsightsError::InvalidArgument("orgId is required".to_string()));
        }
        Ok(&self.org_id)
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.is_empty())
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn require_granularity(&self) -> InsightsResult<Granularity> {
        self.aggregation.ok_or_else(|| {
            InsightsError::InvalidArgument("aggregation granularity is required".to_string())
        })
    }

    pub fn require_duration_type(&self) -> InsightsResult<DurationType> {
        self.duration_type
            .ok_or_else(|| InsightsError::InvalidArgument("durationType is required".to_string()))
    }

    pub fn start_date(&self) -> NaiveDate {
        millis_to_date(self.start_time)
    }

    pub fn end_date(&self) -> NaiveDate {
        millis_to_date(self.end_time)
    }

    /// Label for the first histogram bucket: the normalized override when given,
    /// otherwise the declared start date.
    pub fn first_bucket_label(&self) -> String {
        match self.normalized_start.as_deref() {
            Some(ns) if !ns.is_empty() => ns.chars().take(10).collect(),
            _ => self.start_date().format("%Y-%m-%d").to_string(),
        }
    }

    /// Inclusive number of calendar days covered by the window.
    pub fn window_days(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days() + 1
    }
}

pub fn millis_to_date(millis: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .date_naive()
}
