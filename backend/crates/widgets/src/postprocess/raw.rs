//! Readers over raw datastore responses. Absent paths read as empty or zero so
//! transforms only fail on text that is not JSON at all.

use serde_json::Value;

use insights_common::error::InsightsResult;

pub fn parse(raw: &str) -> InsightsResult<Value> {
    Ok(serde_json::from_str(raw)?)
}

pub fn aggregations(response: &Value) -> &Value {
    &response["aggregations"]
}

pub fn buckets(agg: &Value) -> &[Value] {
    agg["buckets"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// `agg[name].value` of a single-value metric, zero when absent or null.
pub fn metric(agg: &Value, name: &str) -> f64 {
    agg[name]["value"].as_f64().unwrap_or(0.0)
}

pub fn doc_count(value: &Value) -> i64 {
    value["doc_count"].as_i64().unwrap_or(0)
}

pub fn key_string(bucket: &Value) -> String {
    match &bucket["key"] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn key_millis(bucket: &Value) -> i64 {
    bucket["key"]
        .as_i64()
        .or_else(|| bucket["key"].as_f64().map(|k| k as i64))
        .unwrap_or(0)
}

/// Key of the top bucket of a size-1 terms sub-aggregation.
pub fn first_term(bucket: &Value, sub: &str) -> Option<String> {
    buckets(&bucket[sub]).first().map(key_string)
}

/// `(key, doc_count)` pairs of a terms aggregation, in response order.
pub fn term_counts(agg: &Value) -> Vec<(String, i64)> {
    buckets(agg)
        .iter()
        .map(|b| (key_string(b), doc_count(b)))
        .collect()
}

/// Count for `key` in a terms aggregation, compared case-insensitively.
pub fn term_count(agg: &Value, key: &str) -> i64 {
    buckets(agg)
        .iter()
        .filter(|b| key_string(b).eq_ignore_ascii_case(key))
        .map(doc_count)
        .sum()
}

pub fn hit_sources(response: &Value) -> Vec<Value> {
    response["hits"]["hits"]
        .as_array()
        .map(|hits| hits.iter().map(|h| h["_source"].clone()).collect())
        .unwrap_or_default()
}
