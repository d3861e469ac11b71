mod error;
mod widgets;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use insights_common::error::{InsightsError, InsightsResult};
use insights_common::types::ServiceInfo;
use insights_config::{init_tracing, AppConfig};
use insights_datastore::{Datastore, DatastoreClientConfig, OpenSearchClient};
use insights_topology::{
    EmptyDirectory, HttpDirectoryClient, OrganizationDirectory, TopologyCache, TopologyLoader,
};
use insights_widgets::{WidgetContext, WidgetEngine};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WidgetEngine>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("insights-api"))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "\
# HELP insights_up Service up indicator\n\
# TYPE insights_up gauge\n\
insights_up 1\n\
# HELP insights_info Service info\n\
# TYPE insights_info gauge\n\
insights_info{{service=\"insights-api\",version=\"{}\"}} 1\n\
# HELP insights_widget_handlers Registered widget handlers\n\
# TYPE insights_widget_handlers gauge\n\
insights_widget_handlers {}\n",
        env!("CARGO_PKG_VERSION"),
        state.engine.handler_names().len(),
    );

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(widgets::router())
        .layer(cors)
        .with_state(state)
}

async fn build_context(config: &AppConfig) -> InsightsResult<WidgetContext> {
    let client_config = DatastoreClientConfig {
        username: config.datastore_username.clone(),
        password: config.datastore_password.clone(),
        max_retries: config.datastore_max_retries,
        timeout_secs: config.datastore_timeout_secs,
        ..DatastoreClientConfig::new(config.datastore_url.clone())
    };
    let datastore: Arc<dyn Datastore> = Arc::new(
        OpenSearchClient::new(client_config)
            .map_err(|e| InsightsError::Config(format!("datastore client: {e}")))?,
    );

    let directory: Arc<dyn OrganizationDirectory> = match &config.directory_url {
        Some(url) => Arc::new(
            HttpDirectoryClient::new(url, config.datastore_timeout_secs)
                .map_err(|e| InsightsError::Config(format!("directory client: {e}")))?,
        ),
        None => {
            tracing::warn!("DIRECTORY_URL not set, organizations resolve to no components");
            Arc::new(EmptyDirectory)
        }
    };

    let topology: Option<Arc<dyn TopologyCache>> = match &config.topology_url {
        Some(url) => {
            let loader = TopologyLoader::new(url, config.datastore_timeout_secs)
                .map_err(|e| InsightsError::Config(format!("topology loader: {e}")))?;
            let cache = loader.load().await?;
            tracing::info!(nodes = cache.len(), "topology cache loaded");
            Some(Arc::new(cache))
        }
        None => {
            tracing::warn!("TOPOLOGY_URL not set, running without topology cache");
            None
        }
    };

    WidgetContext::new(datastore, directory, topology)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "insights-api", "starting");

    let context = build_context(&config)
        .await
        .expect("failed to initialize upstream clients");
    let engine = WidgetEngine::new(context).expect("failed to register widget handlers");
    tracing::info!(handlers = engine.handler_names().len(), "widget engine ready");

    let app = build_router(AppState {
        engine: Arc::new(engine),
    });
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
