pub const LATEST_SCAN_REPORTS: &str = r#"{
  "size": @size,
  "sort": [{"timestamp": {"order": "desc"}}],
  "_source": ["component_id", "timestamp", "coverage", "duplicated_lines_density", "files"],
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"term": {"scanner": "sonar"}},
        {"range": {"timestamp": {"lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  }
}"#;
