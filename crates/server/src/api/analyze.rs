use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use legalyze_core::{Analysis, AnalysisId, KeyClause, LegalTerm, NewAnalysis, RiskFactor};
use legalyze_ingest::Placeholder;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

const DOCUMENT_ID_REQUIRED: &str = "Document ID is required";

// ── Request/Response types ────────────────────────

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub document_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AnalysesQuery {
    pub document_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    #[schema(value_type = String)]
    pub id: AnalysisId,
    pub summary: String,
    #[schema(value_type = Vec<Object>)]
    pub key_clauses: Vec<KeyClause>,
    #[schema(value_type = Vec<Object>)]
    pub legal_terms: Vec<LegalTerm>,
    #[schema(value_type = Vec<Object>)]
    pub risk_factors: Vec<RiskFactor>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<Analysis> for AnalysisView {
    fn from(a: Analysis) -> Self {
        Self {
            id: a.id,
            summary: a.record.summary,
            key_clauses: a.record.key_clauses,
            legal_terms: a.record.legal_terms,
            risk_factors: a.record.risk_factors,
            created_at: a.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisView,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalysisListResponse {
    #[schema(value_type = Vec<Object>)]
    pub analyses: Vec<Analysis>,
}

/// Trimmed id, `None` when absent or blank.
fn non_blank(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

// ── POST /analyze ─────────────────────────────────

/// Analyze a stored document
///
/// Sends the document text to the LLM and stores the normalized result as a
/// new analysis. Re-analysis always appends.
#[utoipa::path(
    post,
    path = "/analyze",
    tag = "Analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis stored", body = AnalyzeResponse),
        (status = 400, description = "Missing id or placeholder content"),
        (status = 401, description = "No session"),
        (status = 403, description = "Document owned by another user"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Failed to analyze document")
    )
)]
pub async fn analyze_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let Some(raw_id) = non_blank(request.document_id.as_deref()) else {
        return Err(ApiError::bad_request(DOCUMENT_ID_REQUIRED));
    };

    let not_found = || ApiError::NotFound("Document not found".into());
    let document_id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    let document = state
        .store
        .get_document(document_id)
        .await
        .map_err(|e| ApiError::storage("Failed to analyze document", e))?
        .ok_or_else(not_found)?;

    if document.user_id != user_id {
        warn!(document_id = %document.id, "analysis of another user's document refused");
        return Err(ApiError::Forbidden);
    }

    if let Some(placeholder) = Placeholder::detect(&document.content) {
        info!(document_id = %document.id, ?placeholder, "document has no analyzable text");
        return Err(placeholder.into());
    }

    let record = state.analysis.analyze(&document.content).await.map_err(|e| {
        tracing::error!(document_id = %document.id, "Error analyzing document: {}", e);
        ApiError::Internal { error: "Failed to analyze document".into(), details: None }
    })?;

    let analysis = state
        .store
        .insert_analysis(NewAnalysis {
            document_id: document.id,
            user_id,
            record,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to analyze document", e))?;

    info!(document_id = %document.id, analysis_id = %analysis.id, "Analysis stored");

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: analysis.into(),
    }))
}

// ── GET /analyze ──────────────────────────────────

/// List analyses of a document
///
/// Newest first, restricted to analyses owned by the caller.
#[utoipa::path(
    get,
    path = "/analyze",
    tag = "Analysis",
    params(AnalysesQuery),
    responses(
        (status = 200, description = "Analyses of the document", body = AnalysisListResponse),
        (status = 400, description = "Missing document id"),
        (status = 401, description = "No session")
    )
)]
pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<AnalysesQuery>,
) -> Result<Json<AnalysisListResponse>, ApiError> {
    let Some(raw_id) = non_blank(query.document_id.as_deref()) else {
        return Err(ApiError::bad_request(DOCUMENT_ID_REQUIRED));
    };

    // An id that cannot exist has no analyses.
    let Ok(document_id) = Uuid::parse_str(raw_id) else {
        return Ok(Json(AnalysisListResponse { analyses: Vec::new() }));
    };

    let analyses = state
        .store
        .list_analyses(document_id, &user_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch analyses", e))?;
    Ok(Json(AnalysisListResponse { analyses }))
}
