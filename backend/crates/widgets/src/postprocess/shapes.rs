//! Response shapes shared by several widgets.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_in_millis: Option<i64>,
}

impl Header {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            value_in_millis: None,
        }
    }

    pub fn with_millis(value: impl Into<Value>, millis: i64) -> Self {
        Self {
            value: value.into(),
            value_in_millis: Some(millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubHeaderItem {
    pub title: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill_down: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubHeader {
    pub sub_header: Vec<SubHeaderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutInfo {
    pub title: String,
    pub value: i64,
    pub drill_down: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donut {
    pub data: Vec<DonutSlice>,
    pub info: Vec<DonutInfo>,
}

pub fn report_drill_down(report_id: &str, report_title: &str) -> Value {
    json!({"reportId": report_id, "reportTitle": report_title})
}

pub fn url_drill_down(url: String) -> Value {
    json!({"url": url})
}

pub fn to_value<T: Serialize>(shape: &T) -> insights_common::error::InsightsResult<Value> {
    Ok(serde_json::to_value(shape)?)
}
