use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{error::ApiError, protocol::ResponseEnvelope};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod predictor;

use api::{extract_query, recommend, ApiContext};
use config::load_settings;
use predictor::GradioPredictor;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let endpoint = settings.predict_endpoint()?;
    let predictor = GradioPredictor::new(
        endpoint,
        Duration::from_secs(settings.upstream_timeout_secs),
    )?;
    info!(upstream = %predictor.endpoint(), "using gradio predictor");

    let state = AppState {
        api: ApiContext {
            predictor: Arc::new(predictor),
        },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/recommendations", post(http_recommend))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_recommend(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let query = match extract_query(&body) {
        Ok(query) => query,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiError::from(e))).into_response(),
    };

    match recommend(&state.api, &query).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResponseEnvelope::failed(e.message)),
        )
            .into_response(),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
