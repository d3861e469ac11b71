pub const RUNS_LIST: &str = r#"{
  "size": 100,
  "sort": [{"timestamp": {"order": "desc"}}],
  "_source": ["run_id", "automation_id", "automation_name", "status", "timestamp", "duration_ms"],
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  }
}"#;

pub const COMMITS_LIST: &str = r#"{
  "size": 100,
  "sort": [{"timestamp": {"order": "desc"}}],
  "_source": ["commit_id", "title", "author", "branch", "component_id", "timestamp"],
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  }
}"#;

pub const BUILDS_LIST: &str = r#"{
  "size": 100,
  "sort": [{"timestamp": {"order": "desc"}}],
  "_source": ["build_id", "component_id", "branch_id", "status", "timestamp", "duration_ms"],
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  }
}"#;
