pub const COMPONENTS_WITH_BUILDS: &str = r#"{
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
    "distinct_component": {"terms": {"field": "component_id", "size": 10000}}
  }
}"#;

pub const AUTOMATIONS_WITH_RUNS: &str = r#"{
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
    "distinct_automation": {"terms": {"field": "automation_id", "size": 10000}}
  }
}"#;

pub const COMPONENTS_WITH_SCANS: &str = r#"{
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
    "distinct_component": {"terms": {"field": "component_id", "size": 10000}}
  }
}"#;
