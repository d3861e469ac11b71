use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::context::WidgetContext;
use crate::request::WidgetRequest;
use insights_common::error::{InsightsError, InsightsResult};

/// Produces the JSON payload of the widgets served under one handler name.
#[async_trait]
pub trait WidgetHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        widget_id: &str,
        request: &WidgetRequest,
        ctx: &WidgetContext,
    ) -> InsightsResult<Value>;
}

/// Page-level data (filter options) of a dashboard page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageBase {
    pub data: Vec<String>,
    pub aux: BTreeMap<String, String>,
}

/// Page-base handlers are keyed by widget id rather than handler name.
#[async_trait]
pub trait PageBaseHandler: Send + Sync {
    fn widget_id(&self) -> &'static str;

    async fn handle(&self, request: &WidgetRequest, ctx: &WidgetContext) -> InsightsResult<PageBase>;
}

fn index<T: ?Sized>(
    items: Vec<Arc<T>>,
    key: impl Fn(&T) -> &'static str,
) -> InsightsResult<HashMap<&'static str, Arc<T>>> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let k = key(&*item);
        if map.insert(k, item).is_some() {
            return Err(InsightsError::DuplicateHandler(k.to_string()));
        }
    }
    Ok(map)
}

pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn WidgetHandler>>,
}

impl HandlerRegistry {
    pub fn new(handlers: Vec<Arc<dyn WidgetHandler>>) -> InsightsResult<Self> {
        Ok(Self {
            handlers: index(handlers, |h| h.name())?,
        })
    }

    pub fn get(&self, name: &str) -> InsightsResult<Arc<dyn WidgetHandler>> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| InsightsError::HandlerNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

pub struct PageBaseRegistry {
    handlers: HashMap<&'static str, Arc<dyn PageBaseHandler>>,
}

impl PageBaseRegistry {
    pub fn new(handlers: Vec<Arc<dyn PageBaseHandler>>) -> InsightsResult<Self> {
        Ok(Self {
            handlers: index(handlers, |h| h.widget_id())?,
        })
    }

    pub fn get(&self, widget_id: &str) -> InsightsResult<Arc<dyn PageBaseHandler>> {
        self.handlers
            .get(widget_id)
            .cloned()
            .ok_or_else(|| InsightsError::HandlerNotFound(widget_id.to_string()))
    }

    pub fn widget_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
