use std::fmt;

/// Index aliases the engine reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexAlias {
    SecurityFindings,
    RawScanResults,
    BuildData,
    DeployData,
    AutomationMetadata,
    TestSuite,
    TestCases,
    CommitData,
    PullRequestData,
    FlowItems,
    IncidentData,
}

impl IndexAlias {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexAlias::SecurityFindings => "security-findings",
            IndexAlias::RawScanResults => "raw-scan-results",
            IndexAlias::BuildData => "build-data",
            IndexAlias::DeployData => "deploy-data",
            IndexAlias::AutomationMetadata => "automation-metadata",
            IndexAlias::TestSuite => "test-suite",
            IndexAlias::TestCases => "test-cases",
            IndexAlias::CommitData => "commit-data",
            IndexAlias::PullRequestData => "pull-request-data",
            IndexAlias::FlowItems => "flow-items",
            IndexAlias::IncidentData => "incident-data",
        }
    }
}

impl fmt::Display for IndexAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
