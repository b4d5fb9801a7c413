use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use legalyze_core::config::PostgresConfig;
use legalyze_core::{
    Analysis, AnalysisRecord, Document, DocumentId, DocumentWithLatest, KeyClause, LegalTerm,
    NewAnalysis, NewDocument, RiskFactor, UserId,
};

use super::{DocumentStore, StoreError};
use crate::auth::SessionProvider;

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    content: String,
    file_type: String,
    file_size: i64,
    user_id: String,
    uploaded_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            title: row.title,
            content: row.content,
            file_type: row.file_type,
            file_size: row.file_size,
            user_id: row.user_id,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AnalysisRow {
    id: Uuid,
    document_id: Uuid,
    user_id: String,
    summary: String,
    key_clauses: Json<Vec<KeyClause>>,
    legal_terms: Json<Vec<LegalTerm>>,
    risk_factors: Json<Vec<RiskFactor>>,
    created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Analysis {
            id: row.id,
            document_id: row.document_id,
            user_id: row.user_id,
            record: AnalysisRecord {
                summary: row.summary,
                key_clauses: row.key_clauses.0,
                legal_terms: row.legal_terms.0,
                risk_factors: row.risk_factors.0,
            },
            created_at: row.created_at,
        }
    }
}

const ANALYSIS_COLUMNS: &str =
    "id, document_id, user_id, summary, key_clauses, legal_terms, risk_factors, created_at";

/// PostgreSQL-backed store. Migrations under `migrations/` run on connect.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.connection_string())
            .await?;
        info!("PostgreSQL connected: {}", config.host);

        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("Database migrations applied successfully");

        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_document(&self, doc: NewDocument) -> Result<Document, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (id, title, content, file_type, file_size, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, content, file_type, file_size, user_id, uploaded_at",
        )
        .bind(Uuid::new_v4())
        .bind(&doc.title)
        .bind(&doc.content)
        .bind(&doc.file_type)
        .bind(doc.file_size)
        .bind(&doc.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, title, content, file_type, file_size, user_id, uploaded_at \
             FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Document::from))
    }

    async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentWithLatest>, StoreError> {
        let documents = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, title, content, file_type, file_size, user_id, uploaded_at \
             FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let latest = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT DISTINCT ON (document_id) {ANALYSIS_COLUMNS} \
             FROM analyses WHERE user_id = $1 \
             ORDER BY document_id, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut latest: HashMap<Uuid, Analysis> = latest
            .into_iter()
            .map(|row| (row.document_id, Analysis::from(row)))
            .collect();

        Ok(documents
            .into_iter()
            .map(|row| {
                let analyses = latest.remove(&row.id).into_iter().collect();
                DocumentWithLatest { document: row.into(), analyses }
            })
            .collect())
    }

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, StoreError> {
        let record = analysis.record;
        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            "INSERT INTO analyses \
             (id, document_id, user_id, summary, key_clauses, legal_terms, risk_factors) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ANALYSIS_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(analysis.document_id)
        .bind(&analysis.user_id)
        .bind(&record.summary)
        .bind(Json(&record.key_clauses))
        .bind(Json(&record.legal_terms))
        .bind(Json(&record.risk_factors))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_analyses(
        &self,
        document_id: DocumentId,
        user_id: &str,
    ) -> Result<Vec<Analysis>, StoreError> {
        let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses \
             WHERE document_id = $1 AND user_id = $2 \
             ORDER BY created_at DESC"
        ))
        .bind(document_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Analysis::from).collect())
    }
}

#[async_trait]
impl SessionProvider for PgStore {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let user = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM sessions \
             WHERE token = $1 AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
