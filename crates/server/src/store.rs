//! Persistence for documents and analyses.
//!
//! Thin pass-through to the database. Every query that lists rows is scoped
//! to the owning user; `get_document` is unscoped so handlers can tell
//! "missing" (404) apart from "someone else's" (403).

mod memory;
mod postgres;

use async_trait::async_trait;
use legalyze_core::{Analysis, Document, DocumentId, DocumentWithLatest, NewAnalysis, NewDocument};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(&self, doc: NewDocument) -> Result<Document, StoreError>;

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// The user's documents, newest upload first, each with its latest analysis.
    async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentWithLatest>, StoreError>;

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, StoreError>;

    /// Analyses of one document owned by `user_id`, newest first.
    async fn list_analyses(
        &self,
        document_id: DocumentId,
        user_id: &str,
    ) -> Result<Vec<Analysis>, StoreError>;
}
