use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod config;
mod db;
mod metrics;
mod models;
mod services;
mod utils;

use crate::config::AppConfig;
use crate::db::Database;
use crate::services::payments::OrderGateway;

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub gateway: Option<OrderGateway>,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardlink_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting Cardlink Backend v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    // Initialize metrics exporter
    let metrics_handle = metrics::init_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    // Initialize database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database connected and migrated");

    // Initialize the payment gateway client when credentials exist.
    // Order requests without credentials fail with a stable error.
    let gateway = config
        .gateway_credentials()
        .map(|(key_id, key_secret)| OrderGateway::new(&config.gateway_base_url, key_id, key_secret));
    match &gateway {
        Some(_) => tracing::info!("Payment gateway client initialized"),
        None => tracing::warn!("Payment gateway credentials not configured; order proxy disabled"),
    }

    // Build application state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        gateway,
        metrics_handle,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .nest("/api/v1", api::routes::create_router(state.clone()))
        .layer(axum::middleware::from_fn(
            api::middleware::metrics::metrics_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
