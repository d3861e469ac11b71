pub const TEST_SUITE_OVERVIEW: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"run_start": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "rows": {
      "terms": {"field": "test_suite_name", "size": 1000},
      "aggs": {
        "component_id": {"terms": {"field": "component_id", "size": 1}},
        "component_name": {"terms": {"field": "component_name", "size": 1}},
        "automation_id": {"terms": {"field": "automation_id", "size": 1}},
        "last_run": {"max": {"field": "run_start"}},
        "avg_run_time": {"avg": {"field": "duration_ms"}},
        "failed_runs": {"filter": {"term": {"status": "FAILED"}}}
      }
    }
  }
}"#;

pub const COMPONENT_TEST_OVERVIEW: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"run_start": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "rows": {
      "terms": {"field": "component_id", "size": 1000},
      "aggs": {
        "component_name": {"terms": {"field": "component_name", "size": 1}},
        "test_suites": {"cardinality": {"field": "test_suite_name"}},
        "last_run": {"max": {"field": "run_start"}},
        "avg_run_time": {"avg": {"field": "duration_ms"}},
        "failed_runs": {"filter": {"term": {"status": "FAILED"}}}
      }
    }
  }
}"#;

pub const TEST_CASE_OVERVIEW: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"run_start": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "rows": {
      "terms": {"field": "test_case_name", "size": 1000},
      "aggs": {
        "test_suite_name": {"terms": {"field": "test_suite_name", "size": 1}},
        "component_id": {"terms": {"field": "component_id", "size": 1}},
        "component_name": {"terms": {"field": "component_name", "size": 1}},
        "last_run": {"max": {"field": "run_start"}},
        "avg_run_time": {"avg": {"field": "duration_ms"}},
        "failed_runs": {"filter": {"term": {"status": "FAILED"}}}
      }
    }
  }
}"#;
