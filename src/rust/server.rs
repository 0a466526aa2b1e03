//! HTTP transport for the classifier.
//!
//! Exposes `POST /predict`, `GET /health` and `GET /categories`. The fitted
//! classifier is passed in as router state; handlers never mutate it.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::classifier::{Category, Classifier, ClassifierError, Prediction};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

/// Build the router with all routes and a permissive CORS policy.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/categories", get(list_categories))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(request) = payload?;
    let text = match request.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ApiError::InvalidInput("No text provided".into())),
    };

    debug!("Classifying {} characters", text.len());
    let classifier = Arc::clone(&state.classifier);
    run_blocking(move || classifier.predict(&text)).await
}

/// Runs a prediction on the blocking pool. A panic inside `f` only fails
/// this request.
async fn run_blocking<F>(f: F) -> Result<Json<Prediction>, ApiError>
where
    F: FnOnce() -> Result<Prediction, ClassifierError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("Prediction task failed: {}", e);
        ApiError::Internal(format!("Prediction task failed: {}", e))
    })?;

    match result {
        Ok(prediction) => Ok(Json(prediction)),
        Err(e) => {
            error!("Prediction failed: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.classifier.categories().to_vec())
}
