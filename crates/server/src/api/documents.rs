use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use legalyze_core::{DocumentId, DocumentWithLatest, LegalyzeError, NewDocument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

const FILE_AND_TITLE_REQUIRED: &str = "File and title are required";

// ── Response types ────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub title: String,
    pub file_type: String,
    pub file_size: i64,
    #[schema(value_type = String)]
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub document: UploadedDocument,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub documents: Vec<DocumentWithLatest>,
}

struct UploadedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    ApiError::BadRequest {
        error: "Invalid multipart body".into(),
        message: Some(e.body_text()),
    }
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let name = field.file_name().unwrap_or("unnamed").to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadedFile { name, content_type, bytes: bytes.to_vec() })
}

// ── POST /documents ───────────────────────────────

/// Upload a document
///
/// Accepts multipart/form-data with `file` and `title` fields. Text is
/// extracted (UTF-8 decode, OCR for images, a placeholder for PDF/Word) and
/// stored for the authenticated user.
#[utoipa::path(
    post,
    path = "/documents",
    tag = "Documents",
    request_body(content_type = "multipart/form-data", description = "`file` and `title` fields"),
    responses(
        (status = 200, description = "Document stored", body = UploadResponse),
        (status = 400, description = "Missing field or empty content"),
        (status = 401, description = "No session"),
        (status = 413, description = "Upload exceeds the size limit"),
        (status = 500, description = "Failed to upload document")
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file = None;
    let mut title = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => file = Some(read_file(field).await?),
            Some("title") => title = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let (Some(file), Some(title)) = (file, title) else {
        return Err(ApiError::bad_request(FILE_AND_TITLE_REQUIRED));
    };

    let content = state
        .extractor
        .extract(&file.bytes, &file.content_type, &file.name)
        .await;

    let new_doc = NewDocument::new(
        title,
        content,
        Some(&file.content_type),
        file.bytes.len(),
        user_id,
    )
    .map_err(|e| match e {
        LegalyzeError::MissingField(_) => ApiError::bad_request(FILE_AND_TITLE_REQUIRED),
        LegalyzeError::EmptyContent => ApiError::bad_request(e.to_string()),
    })?;

    let document = state
        .store
        .insert_document(new_doc)
        .await
        .map_err(|e| {
            tracing::error!("Error uploading document: {}", e);
            ApiError::internal("Failed to upload document", e)
        })?;

    info!(
        document_id = %document.id,
        file_type = %document.file_type,
        "Stored '{}' ({} bytes, {} chars)",
        file.name,
        document.file_size,
        document.content.chars().count(),
    );

    Ok(Json(UploadResponse {
        success: true,
        document: UploadedDocument {
            id: document.id,
            title: document.title,
            file_type: document.file_type,
            file_size: document.file_size,
            uploaded_at: document.uploaded_at,
        },
    }))
}

// ── GET /documents ────────────────────────────────

/// List the caller's documents
///
/// Newest upload first; each entry embeds at most its most recent analysis.
#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "Documents owned by the caller", body = DocumentListResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let documents = state
        .store
        .list_documents(&user_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch documents", e))?;
    Ok(Json(DocumentListResponse { documents }))
}
