pub const CWE_TOP_25: &str = r#"{
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
    "total": {"filter": {"exists": {"field": "cwe_id"}}},
    "cwe": {
      "filters": {
        "filters": {
            "CWE-787": {"term": {"cwe_id": "CWE-787"}},
            "CWE-79": {"term": {"cwe_id": "CWE-79"}},
            "CWE-89": {"term": {"cwe_id": "CWE-89"}},
            "CWE-416": {"term": {"cwe_id": "CWE-416"}},
            "CWE-78": {"term": {"cwe_id": "CWE-78"}},
            "CWE-20": {"term": {"cwe_id": "CWE-20"}},
            "CWE-125": {"term": {"cwe_id": "CWE-125"}},
            "CWE-22": {"term": {"cwe_id": "CWE-22"}},
            "CWE-352": {"term": {"cwe_id": "CWE-352"}},
            "CWE-434": {"term": {"cwe_id": "CWE-434"}},
            "CWE-862": {"term": {"cwe_id": "CWE-862"}},
            "CWE-476": {"term": {"cwe_id": "CWE-476"}},
            "CWE-287": {"term": {"cwe_id": "CWE-287"}},
            "CWE-190": {"term": {"cwe_id": "CWE-190"}},
            "CWE-502": {"term": {"cwe_id": "CWE-502"}},
            "CWE-77": {"term": {"cwe_id": "CWE-77"}},
            "CWE-119": {"term": {"cwe_id": "CWE-119"}},
            "CWE-798": {"term": {"cwe_id": "CWE-798"}},
            "CWE-918": {"term": {"cwe_id": "CWE-918"}},
            "CWE-306": {"term": {"cwe_id": "CWE-306"}},
            "CWE-362": {"term": {"cwe_id": "CWE-362"}},
            "CWE-269": {"term": {"cwe_id": "CWE-269"}},
            "CWE-94": {"term": {"cwe_id": "CWE-94"}},
            "CWE-863": {"term": {"cwe_id": "CWE-863"}},
            "CWE-276": {"term": {"cwe_id": "CWE-276"}}
        }
      }
    }
  }
}"#;

pub const OPEN_BY_SEVERITY: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"terms": {"remediation_status": ["OPEN", "IN_PROGRESS"]}},
        {"range": {"timestamp": {"lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "severity": {"terms": {"field": "severity", "size": 10}}
  }
}"#;

pub const REMEDIATED_BY_SEVERITY: &str = r#"{
  "size": 0,
  "query": {
    "bool": {
      "filter": [
        {"term": {"org_id": "@orgId"}},
        {"term": {"remediation_status": "CLOSED"}},
        {"range": {"remediated_at": {"gte": @startTime, "lte": @endTime, "format": "epoch_millis"}}}
      ]
    }
  },
  "aggs": {
    "severity": {"terms": {"field": "severity", "size": 10}}
  }
}"#;
