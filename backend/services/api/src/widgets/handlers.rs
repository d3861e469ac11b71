use axum::extract::{Path, State};
use axum::Json;
use insights_widgets::WidgetRequest;
use serde_json::Value;

use crate::error::ApiError;
use crate::widgets::responses::PageBaseResponse;
use crate::AppState;

pub async fn resolve_widget(
    State(state): State<AppState>,
    Path((widget_id, name)): Path<(String, String)>,
    Json(request): Json<WidgetRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = state.engine.execute(&widget_id, &name, &request).await?;
    Ok(Json(data))
}

pub async fn resolve_page_base(
    State(state): State<AppState>,
    Path(widget_id): Path<String>,
    Json(request): Json<WidgetRequest>,
) -> Result<Json<PageBaseResponse>, ApiError> {
    let page = state.engine.page_base(&widget_id, &request).await?;
    Ok(Json(page.into()))
}
