pub const COMMIT_TRENDS: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ],
      "must": []
    }
  },
  "aggs": {
    "commits_count": {"value_count": {"field": "commit_id"}},
    "unique_authors": {"cardinality": {"field": "author"}},
    "weekly_commits": {
      "date_histogram": {"field": "timestamp", "calendar_interval": "week", "min_doc_count": 0}
    },
    "avg_weekly_commits": {"avg_bucket": {"buckets_path": "weekly_commits>_count"}},
    "commits_over_time": {
      "date_histogram": {
        "field": "timestamp",
        "calendar_interval": "@interval",
        "min_doc_count": 0,
        "extended_bounds": {"min": @startTime, "max": @endTime}
      }
    }
  }
}"#;

pub const WORKFLOW_RUNS: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"range": {"timestamp": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ],
      "must_not": []
    }
  },
  "aggs": {
    "runs_count": {"value_count": {"field": "run_id"}},
    "runs_over_time": {
      "date_histogram": {
        "field": "timestamp",
        "calendar_interval": "@interval",
        "min_doc_count": 0,
        "extended_bounds": {"min": @startTime, "max": @endTime}
      },
      "aggs": {
        "status": {"terms": {"field": "status", "size": 10}}
      }
    }
  }
}"#;

pub const BUILDS: &str = r#"{
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
    "builds_count": {"value_count": {"field": "build_id"}},
    "builds_over_time": {
      "date_histogram": {
        "field": "timestamp",
        "calendar_interval": "@interval",
        "min_doc_count": 0,
        "extended_bounds": {"min": @startTime, "max": @endTime}
      },
      "aggs": {
        "avg_duration": {"avg": {"field": "duration_ms"}}
      }
    }
  }
}"#;

pub const DEPLOYMENTS: &str = r#"{
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
    "deployments_count": {"value_count": {"field": "deployment_id"}},
    "deployments_over_time": {
      "date_histogram": {
        "field": "timestamp",
        "calendar_interval": "@interval",
        "min_doc_count": 0,
        "extended_bounds": {"min": @startTime, "max": @endTime}
      }
    }
  }
}"#;

pub const PULL_REQUESTS: &str = r#"{
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
    "pull_requests_count": {"value_count": {"field": "pull_request_id"}},
    "pull_requests_over_time": {
      "date_histogram": {
        "field": "timestamp",
        "calendar_interval": "@interval",
        "min_doc_count": 1
      },
      "aggs": {
        "status": {"terms": {"field": "review_status", "size": 10}}
      }
    }
  }
}"#;
