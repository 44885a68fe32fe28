//! REST API for the Retronova arcade backend

pub mod extract;
mod handlers;
pub mod responses;
mod routes;

pub use routes::*;

use crate::config::ApiConfig;
use crate::core::Storage;
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use responses::HealthResponse;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    map_response_body::MapResponseBodyLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

const SERVICE_NAME: &str = "retronova-api";

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub storage: Arc<dyn Storage>,
}

impl ApiState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

/// Serve the API until `shutdown` resolves
pub async fn start_server<F>(state: ApiState, config: &ApiConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state, config);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("API server listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server error")?;

    info!("API server stopped");
    Ok(())
}

/// Create the main API application
pub fn create_app(state: ApiState, config: &ApiConfig) -> Router {
    Router::new()
        .merge(create_user_routes())
        .merge(create_friend_routes())
        .merge(create_game_routes())
        .merge(create_arcade_machine_routes())
        .merge(create_party_routes())
        .merge(create_payment_routes())
        .merge(create_promo_code_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors_origins))
                .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(config.max_request_size_bytes)),
        )
}

/// Credentialed CORS for the configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Health check handler
async fn health_handler(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match state.storage.ping().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let body = HealthResponse {
        status: if status.is_success() { "healthy" } else { "unhealthy" }.to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database: database.to_string(),
    };

    (status, Json(body))
}
