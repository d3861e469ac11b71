use std::sync::Arc;

use crate::postprocess::PostProcessRegistry;
use crate::templates::TemplateStore;
use insights_common::error::InsightsResult;
use insights_datastore::Datastore;
use insights_topology::{OrganizationDirectory, TopologyCache};

/// Shared, read-only collaborators handed to every widget handler.
#[derive(Clone)]
pub struct WidgetContext {
    pub datastore: Arc<dyn Datastore>,
    pub directory: Arc<dyn OrganizationDirectory>,
    pub topology: Option<Arc<dyn TopologyCache>>,
    pub templates: Arc<TemplateStore>,
    pub post_processors: Arc<PostProcessRegistry>,
}

impl WidgetContext {
    pub fn new(
        datastore: Arc<dyn Datastore>,
        directory: Arc<dyn OrganizationDirectory>,
        topology: Option<Arc<dyn TopologyCache>>,
    ) -> InsightsResult<Self> {
        Ok(Self {
            datastore,
            directory,
            topology,
            templates: Arc::new(TemplateStore::builtin()),
            post_processors: Arc::new(PostProcessRegistry::builtin()?),
        })
    }

    pub fn topology(&self) -> Option<&dyn TopologyCache> {
        self.topology.as_deref()
    }
}
