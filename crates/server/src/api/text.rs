//! Text-only LLM helpers that do not touch stored documents.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

const TEXT_REQUIRED: &str = "Text is required";

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SimplifyResponse {
    pub simplified: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct KeyPhrasesResponse {
    pub phrases: Vec<String>,
}

/// Unreadable bodies are treated as missing text.
fn require_text(body: Result<Json<TextRequest>, JsonRejection>) -> Result<String, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request(TEXT_REQUIRED));
    }
    Ok(text.to_owned())
}

/// Rewrite legal text in plain language
#[utoipa::path(
    post,
    path = "/simplify",
    tag = "Text",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Simplified text", body = SimplifyResponse),
        (status = 400, description = "Empty text"),
        (status = 401, description = "No session"),
        (status = 500, description = "Provider failure")
    )
)]
pub async fn simplify(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SimplifyResponse>, ApiError> {
    let text = require_text(body)?;
    let simplified = state.analysis.simplify_legal_text(&text).await.map_err(|e| {
        tracing::error!("Error simplifying text: {}", e);
        ApiError::Internal { error: "Failed to simplify text".into(), details: None }
    })?;
    Ok(Json(SimplifyResponse { simplified }))
}

/// Extract notable legal phrases
#[utoipa::path(
    post,
    path = "/key-phrases",
    tag = "Text",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Key phrases, empty when the model output was unusable", body = KeyPhrasesResponse),
        (status = 400, description = "Empty text"),
        (status = 401, description = "No session"),
        (status = 500, description = "Provider failure")
    )
)]
pub async fn key_phrases(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<KeyPhrasesResponse>, ApiError> {
    let text = require_text(body)?;
    let phrases = state.analysis.extract_key_phrases(&text).await.map_err(|e| {
        tracing::error!("Error extracting key phrases: {}", e);
        ApiError::Internal { error: "Failed to extract key phrases".into(), details: None }
    })?;
    Ok(Json(KeyPhrasesResponse { phrases }))
}
