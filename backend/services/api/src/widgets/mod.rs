pub mod handlers;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/widgets/{widget_id}/page-base",
            post(handlers::resolve_page_base),
        )
        .route("/widgets/{widget_id}/{name}", post(handlers::resolve_widget))
}
