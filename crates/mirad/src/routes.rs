//! API routes for mirad.

use crate::analysis;
use crate::server::AppState;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use base64::Engine as _;
use mira_common::api::{ErrorBody, HealthResponse, StatusResponse, UsedQuestionsResponse};
use mira_common::{AnalysisError, Decision};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

type AppStateArc = Arc<AppState>;

/// Error body for a request with no image payload at all.
const NO_IMAGE_MESSAGE: &str = "No image data received in request";

// ============================================================================
// Analysis Routes
// ============================================================================

pub fn analyze_routes() -> Router<AppStateArc> {
    Router::new().route("/api/analyze", post(analyze_image))
}

/// Analyze one face image and suggest the next interview question.
async fn analyze_image(
    State(state): State<AppStateArc>,
    request: Request,
) -> Result<Json<Decision>, (StatusCode, Json<ErrorBody>)> {
    let image_bytes = extract_image_bytes(request).await.map_err(error_response)?;
    info!("Analyzing image ({} bytes)", image_bytes.len());

    let decision = analysis::analyze(&state, &image_bytes)
        .await
        .map_err(error_response)?;

    Ok(Json(decision))
}

fn error_response(err: AnalysisError) -> (StatusCode, Json<ErrorBody>) {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("Analysis failed: {err}");
    } else {
        warn!("Rejected analysis request: {err}");
    }
    (status, Json(ErrorBody::new(err.to_string())))
}

/// Urlencoded analyze body.
#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    image: Option<String>,
}

/// Pull the raw image bytes out of the request: a multipart `image` file
/// field, a multipart or urlencoded `image` text field holding base64
/// (optionally with a data-URL header before the comma), or nothing.
async fn extract_image_bytes(request: Request) -> Result<Vec<u8>, AnalysisError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AnalysisError::InvalidImage(format!("Malformed multipart body: {e}")))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AnalysisError::InvalidImage(format!("Malformed multipart body: {e}")))?
        {
            if field.name() != Some("image") {
                continue;
            }

            let is_file = field.file_name().is_some();
            let data = field
                .bytes()
                .await
                .map_err(|e| AnalysisError::InvalidImage(format!("Unreadable image field: {e}")))?;

            if is_file {
                return Ok(data.to_vec());
            }

            let text = String::from_utf8(data.to_vec()).map_err(|_| {
                AnalysisError::InvalidImage("Image field is not valid text".to_string())
            })?;
            return decode_base64_image(&text);
        }

        Err(AnalysisError::InvalidImage(NO_IMAGE_MESSAGE.to_string()))
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<AnalyzeForm>::from_request(request, &())
            .await
            .map_err(|e| AnalysisError::InvalidImage(format!("Malformed form body: {e}")))?;

        match form.image {
            Some(text) => decode_base64_image(&text),
            None => Err(AnalysisError::InvalidImage(NO_IMAGE_MESSAGE.to_string())),
        }
    } else {
        Err(AnalysisError::InvalidImage(NO_IMAGE_MESSAGE.to_string()))
    }
}

/// Decode a base64 image payload, stripping a data-URL header
/// ("data:image/png;base64,...") when present.
fn decode_base64_image(raw: &str) -> Result<Vec<u8>, AnalysisError> {
    let payload = match raw.split_once(',') {
        Some((_, rest)) => rest,
        None => raw,
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AnalysisError::InvalidImage(format!("Could not decode base64 image: {e}")))
}

// ============================================================================
// Session Routes
// ============================================================================

pub fn session_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/reset-interview", post(reset_interview))
        .route("/api/used-questions", get(used_questions))
}

/// Reset interview state for a new session.
async fn reset_interview(State(state): State<AppStateArc>) -> Json<StatusResponse> {
    state.session.write().await.reset();
    info!("Interview state reset");

    Json(StatusResponse::success(
        "Interview state reset successfully. Next interview will start with opening question.",
    ))
}

/// Snapshot of the questions asked in the current session.
async fn used_questions(State(state): State<AppStateArc>) -> Json<UsedQuestionsResponse> {
    let session = state.session.read().await;
    let questions = session.snapshot();

    Json(UsedQuestionsResponse {
        status: "success".to_string(),
        count: questions.len(),
        questions,
    })
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/test", get(test_api))
}

/// Liveness check.
async fn test_api() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "Server is active and responding".to_string(),
        time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}
