//! Scope-wide and per-component metric queries. Both skeletons take the metric's
//! aggregation block through `@metricAggs`; the fragments below are that block.

pub const SCOPED_METRICS: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": @metricAggs
}"#;

pub const METRICS_BY_COMPONENT: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "by_component": {
      "terms": {"field": "component_id", "size": 10000},
      "aggs": @metricAggs
    }
  }
}"#;

pub const COUNT_COMMITS: &str = r#"{"value": {"value_count": {"field": "commit_id"}}}"#;
pub const COUNT_RUNS: &str = r#"{"value": {"value_count": {"field": "run_id"}}}"#;
pub const COUNT_BUILDS: &str = r#"{"value": {"value_count": {"field": "build_id"}}}"#;
pub const COUNT_DEPLOYMENTS: &str = r#"{"value": {"value_count": {"field": "deployment_id"}}}"#;

pub const PR_STATUS: &str = r#"{"status": {"terms": {"field": "review_status", "size": 10}}}"#;
pub const OPEN_SEVERITY: &str = r#"{"status": {"filter": {"terms": {"remediation_status": ["OPEN", "IN_PROGRESS"]}}, "aggs": {"severity": {"terms": {"field": "severity", "size": 10}}}}}"#;
pub const WORKLOAD_KIND: &str = r#"{"kind": {"terms": {"field": "kind", "size": 10}}}"#;

pub const CYCLE_TIME: &str = r#"{
  "items": {"value_count": {"field": "cycle_time_ms"}},
  "coding": {"sum": {"field": "coding_time_ms"}},
  "pickup": {"sum": {"field": "pickup_time_ms"}},
  "review": {"sum": {"field": "review_time_ms"}},
  "deploy": {"sum": {"field": "deploy_time_ms"}}
}"#;

pub const DEV_CYCLE_TIME: &str = r#"{
  "items": {"value_count": {"field": "dev_cycle_time_ms"}},
  "development": {"sum": {"field": "development_time_ms"}},
  "code_review": {"sum": {"field": "code_review_time_ms"}},
  "testing": {"sum": {"field": "testing_time_ms"}}
}"#;

pub const RECOVERY_TIME: &str = r#"{
  "time": {"sum": {"field": "recovery_time_ms"}},
  "items": {"value_count": {"field": "recovery_time_ms"}}
}"#;

pub const LEAD_TIME: &str = r#"{
  "time": {"sum": {"field": "lead_time_ms"}},
  "items": {"value_count": {"field": "lead_time_ms"}}
}"#;

pub const FLOW_TIME: &str = r#"{
  "active": {"sum": {"field": "active_time_ms"}},
  "wait": {"sum": {"field": "wait_time_ms"}}
}"#;

pub const RUN_FAILURES: &str = r#"{
  "value": {"value_count": {"field": "run_id"}},
  "failed": {"filter": {"term": {"status": "FAILURE"}}}
}"#;
