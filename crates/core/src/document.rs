use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisRecord;
use crate::error::LegalyzeError;

/// Identity issued by the external auth provider.
pub type UserId = String;

pub type DocumentId = Uuid;
pub type AnalysisId = Uuid;

/// MIME type recorded when the client does not declare one.
pub const DEFAULT_FILE_TYPE: &str = "text/plain";

/// An uploaded file's extracted text plus metadata. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub file_type: String,
    pub file_size: i64,
    pub user_id: UserId,
    pub uploaded_at: DateTime<Utc>,
}

/// A validated document ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub file_type: String,
    pub file_size: i64,
    pub user_id: UserId,
}

impl NewDocument {
    /// Rejects an empty title or empty extracted content.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        file_type: Option<&str>,
        file_size: usize,
        user_id: impl Into<UserId>,
    ) -> Result<Self, LegalyzeError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LegalyzeError::MissingField("title"));
        }
        let content = content.into();
        if content.is_empty() {
            return Err(LegalyzeError::EmptyContent);
        }
        let file_type = file_type
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_FILE_TYPE)
            .to_string();
        Ok(Self {
            title,
            content,
            file_type,
            file_size: file_size as i64,
            user_id: user_id.into(),
        })
    }
}

/// One persisted AI evaluation of a document. Re-analysis appends a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: AnalysisId,
    pub document_id: DocumentId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub document_id: DocumentId,
    pub user_id: UserId,
    pub record: AnalysisRecord,
}

/// Listing entry: a document with at most its most recent analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWithLatest {
    #[serde(flatten)]
    pub document: Document,
    pub analyses: Vec<Analysis>,
}
