//! Pure reshaping of raw datastore responses into widget contracts.

pub mod activity;
pub mod dates;
pub mod flow;
pub mod palette;
pub mod percent;
pub mod raw;
pub mod security;
pub mod series;
pub mod shapes;
pub mod sonar;
pub mod status;
pub mod test_overview;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::request::WidgetRequest;
use activity::{ActivityKind, ActivityProcessor};
use flow::CycleTimeProcessor;
use insights_common::error::{InsightsError, InsightsResult};
use security::SecurityFindingsProcessor;

/// Raw responses keyed by template name (or multi-search key).
pub type Raws = HashMap<String, String>;

pub fn raw_response<'a>(raws: &'a Raws, key: &str) -> InsightsResult<&'a str> {
    raws.get(key)
        .map(String::as_str)
        .ok_or_else(|| InsightsError::Internal(format!("no raw response for {key}")))
}

/// Shapes every widget (spec key) one handler serves.
pub trait PostProcessor: Send + Sync {
    /// Handler name the processor is registered under.
    fn name(&self) -> &'static str;

    /// Widget ids this processor can shape.
    fn spec_keys(&self) -> &'static [&'static str];

    fn process(&self, spec_key: &str, raws: &Raws, request: &WidgetRequest) -> InsightsResult<Value>;
}

pub struct PostProcessRegistry {
    processors: HashMap<&'static str, Arc<dyn PostProcessor>>,
}

impl PostProcessRegistry {
    pub fn new(processors: Vec<Arc<dyn PostProcessor>>) -> InsightsResult<Self> {
        let mut map = HashMap::with_capacity(processors.len());
        for p in processors {
            let name = p.name();
            if map.insert(name, p).is_some() {
                return Err(InsightsError::DuplicateHandler(name.to_string()));
            }
        }
        Ok(Self { processors: map })
    }

    pub fn builtin() -> InsightsResult<Self> {
        let mut processors: Vec<Arc<dyn PostProcessor>> = [
            ActivityKind::Commits,
            ActivityKind::WorkflowRuns,
            ActivityKind::Builds,
            ActivityKind::Deployments,
            ActivityKind::PullRequests,
        ]
        .into_iter()
        .map(|kind| Arc::new(ActivityProcessor::new(kind)) as Arc<dyn PostProcessor>)
        .collect();
        processors.push(Arc::new(SecurityFindingsProcessor));
        processors.push(Arc::new(CycleTimeProcessor));
        Self::new(processors)
    }

    /// Run the processor registered for `handler` on the widget `spec_key`.
    pub fn run(
        &self,
        handler: &str,
        spec_key: &str,
        raws: &Raws,
        request: &WidgetRequest,
    ) -> InsightsResult<Value> {
        let processor = self
            .processors
            .get(handler)
            .ok_or_else(|| InsightsError::PostProcessNotFound(handler.to_string()))?;
        if !processor.spec_keys().iter().any(|k| *k == spec_key) {
            return Err(InsightsError::PostProcessNotFound(format!(
                "{handler}/{spec_key}"
            )));
        }
        processor.process(spec_key, raws, request)
    }

    pub fn names(&self) -> impl Iterator<Item = &&'static str> {
        self.processors.keys()
    }
}
