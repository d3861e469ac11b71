use std::collections::BTreeMap;

use insights_widgets::PageBase;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PageBaseResponse {
    pub data: Vec<String>,
    pub aux: BTreeMap<String, String>,
}

impl From<PageBase> for PageBaseResponse {
    fn from(page: PageBase) -> Self {
        Self {
            data: page.data,
            aux: page.aux,
        }
    }
}
