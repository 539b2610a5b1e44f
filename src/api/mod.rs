use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{CommandService, SeaOrmCommandService};

mod error;
mod observability;
pub mod receiver;
mod system;
pub mod tasks;
mod types;

pub use error::ApiError;
pub use types::*;

/// Path Slack posts slash commands to.
pub const RECEIVER_PATH: &str = "/task-reminder/receiver";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub commands: Arc<dyn CommandService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let commands: Arc<dyn CommandService> = Arc::new(SeaOrmCommandService::new(store.clone()));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        commands,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    // The User resource is intentionally absent: it exposes no operations.
    Router::new()
        .route(RECEIVER_PATH, post(receiver::receive))
        .route(
            "/tasks",
            get(tasks::index).post(tasks::store).delete(tasks::clear),
        )
        .route(
            "/tasks/{id}",
            get(tasks::show)
                .patch(tasks::update)
                .put(tasks::replace)
                .delete(tasks::destroy),
        )
        .route("/info", get(system::info))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
