//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pairing_core::{Features, Prediction};
use pairing_dataset::DataSummary;
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::state::{self, AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/predict", post(predict))
        .route("/data-summary", get(data_summary))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Classify one student and log the submission
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Features>, JsonRejection>,
) -> Result<Json<Prediction>, AppError> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let Json(features) = payload?;

    debug!(request_id = %request_id, "Received prediction request: {:?}", features);
    let prediction = state::execute_predict(&state, features, &request_id).await?;
    info!(request_id = %request_id, "Prediction: {}", prediction.label);

    Ok(Json(prediction))
}

/// Dashboard statistics over the whole dataset
async fn data_summary(State(state): State<AppState>) -> Result<Json<DataSummary>, AppError> {
    let summary = state::execute_summary(&state).await?;
    Ok(Json(summary))
}

async fn fallback() -> AppError {
    AppError::NotFound
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    /// Body could not be read or decoded into the expected shape
    Rejected(StatusCode, String),
    InvalidRequest(String),
    NotFound,
    InternalError(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<pairing_core::Error> for AppError {
    fn from(err: pairing_core::Error) -> Self {
        if err.is_client_error() {
            AppError::InvalidRequest(err.to_string())
        } else {
            AppError::InternalError(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Rejected(status, msg) => (status, "invalid_request_error", msg),
            AppError::InvalidRequest(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "Not found".to_string(),
            ),
            AppError::InternalError(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { message, kind },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_422() {
        let err: AppError = pairing_core::Error::validation("risk_taking", "out of range").into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_dataset_error_maps_to_500() {
        let err: AppError = pairing_core::Error::dataset("unreadable").into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
