//! Assist endpoints: image upload, the three intents, and the session view

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::orchestrator::IntentOutcome;
use crate::upload::UploadedImage;

/// Build the assist router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/image", put(upload_image))
        .route("/assist/scene", post(analyze_scene))
        .route("/assist/text", post(extract_text))
        .route("/assist/narrate", post(narrate))
        .route("/session", get(session_view).delete(reset_session))
        .with_state(state)
}

/// Reply to an intent request
///
/// `status` is `ok` when the intent completed; `no_image` and
/// `nothing_to_narrate` are ordinary empty-input states, reported as
/// 200s rather than errors.
#[derive(Debug, Serialize)]
pub struct IntentReply {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl IntentReply {
    fn completed(result: String) -> Self {
        Self {
            status: "ok",
            result: Some(result),
            message: None,
        }
    }

    const fn no_image() -> Self {
        Self {
            status: "no_image",
            result: None,
            message: Some("upload an image first"),
        }
    }

    const fn nothing_to_narrate() -> Self {
        Self {
            status: "nothing_to_narrate",
            result: None,
            message: Some("generate a scene description or extract text first"),
        }
    }

    fn from_outcome(outcome: IntentOutcome) -> Self {
        match outcome {
            IntentOutcome::Completed(result) => Self::completed(result),
            IntentOutcome::NoImage => Self::no_image(),
            IntentOutcome::NothingToNarrate => Self::nothing_to_narrate(),
        }
    }
}

/// Component failures rendered at the API boundary
#[derive(Debug)]
enum AssistError {
    BadRequest(String),
    Extraction(String),
    Description(String),
}

impl IntoResponse for AssistError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match self {
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, "bad_request", detail),
            Self::Extraction(detail) => (StatusCode::BAD_GATEWAY, "extraction_failed", detail),
            Self::Description(detail) => (StatusCode::BAD_GATEWAY, "description_failed", detail),
        };
        let body = serde_json::json!({ "error": kind, "detail": detail });
        (status, Json(body)).into_response()
    }
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadReply {
    pub mime_type: String,
    pub bytes: usize,
}

/// Attach an image to the session
///
/// The body is the raw image payload; the `content-type` header declares
/// the MIME type, or is omitted to have the payload sniffed.
async fn upload_image(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadReply>, AssistError> {
    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        // strip any "; charset=..." parameters
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty() && v != "application/octet-stream");

    let image = match declared {
        Some(mime_type) => UploadedImage::new(body.to_vec(), mime_type),
        None => UploadedImage::from_bytes(body.to_vec()),
    }
    .map_err(|e| AssistError::BadRequest(e.to_string()))?;

    let reply = UploadReply {
        mime_type: image.mime_type().to_string(),
        bytes: image.len(),
    };

    state.orchestrator.lock().await.attach_image(image);
    Ok(Json(reply))
}

/// Analyze the scene in the attached image
async fn analyze_scene(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<IntentReply>, AssistError> {
    let mut orchestrator = state.orchestrator.lock().await;
    let outcome = orchestrator
        .analyze_scene()
        .await
        .map_err(|e| AssistError::Description(e.to_string()))?;
    Ok(Json(IntentReply::from_outcome(outcome)))
}

/// Extract printed text from the attached image
async fn extract_text(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<IntentReply>, AssistError> {
    let mut orchestrator = state.orchestrator.lock().await;
    let outcome = orchestrator
        .extract_text()
        .await
        .map_err(|e| AssistError::Extraction(e.to_string()))?;
    Ok(Json(IntentReply::from_outcome(outcome)))
}

/// Narrate the stored result (scene description before extracted text)
async fn narrate(State(state): State<Arc<ApiState>>) -> Json<IntentReply> {
    let orchestrator = state.orchestrator.lock().await;
    Json(IntentReply::from_outcome(orchestrator.narrate()))
}

/// The two display slots plus session metadata
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: uuid::Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub image_attached: bool,
    pub scene_description: Option<String>,
    pub extracted_text: Option<String>,
}

/// Current session state
async fn session_view(State(state): State<Arc<ApiState>>) -> Json<SessionView> {
    let orchestrator = state.orchestrator.lock().await;
    let session = orchestrator.state();
    Json(SessionView {
        session_id: session.id(),
        started_at: session.started_at(),
        image_attached: orchestrator.has_image(),
        scene_description: session.scene().map(ToString::to_string),
        extracted_text: session.text().map(ToString::to_string),
    })
}

/// Start a new session, dropping the image and both result slots
async fn reset_session(State(state): State<Arc<ApiState>>) -> Json<SessionView> {
    let mut orchestrator = state.orchestrator.lock().await;
    orchestrator.reset();
    let session = orchestrator.state();
    Json(SessionView {
        session_id: session.id(),
        started_at: session.started_at(),
        image_attached: false,
        scene_description: None,
        extracted_text: None,
    })
}
