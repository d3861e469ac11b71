pub const DEPLOYED_ENVIRONMENTS: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}}
      ],
      "must": [
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "environments": {"terms": {"field": "environment", "size": 500}}
  }
}"#;

pub const BUILT_COMPONENTS: &str = r#"{
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
    "distinct_component": {
      "terms": {"field": "component_id", "size": 10000},
      "aggs": {
        "component_name": {"terms": {"field": "component_name", "size": 1}}
      }
    }
  }
}"#;
