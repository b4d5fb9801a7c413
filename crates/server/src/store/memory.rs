use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use legalyze_core::{
    Analysis, Document, DocumentId, DocumentWithLatest, NewAnalysis, NewDocument, UserId,
};

use super::{DocumentStore, StoreError};
use crate::auth::SessionProvider;

/// Process-local store used when PostgreSQL is not configured, and in tests.
/// Rows are kept in insertion order so "newest first" is a reverse scan.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
    analyses: RwLock<Vec<Analysis>>,
    sessions: RwLock<HashMap<String, UserId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed session tokens (`token`, `user_id`).
    pub fn with_sessions<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (String, UserId)>,
    {
        Self {
            sessions: RwLock::new(tokens.into_iter().collect()),
            ..Self::default()
        }
    }

    pub async fn add_session(&self, token: impl Into<String>, user_id: impl Into<UserId>) {
        self.sessions.write().await.insert(token.into(), user_id.into());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, doc: NewDocument) -> Result<Document, StoreError> {
        let document = Document {
            id: Uuid::new_v4(),
            title: doc.title,
            content: doc.content,
            file_type: doc.file_type,
            file_size: doc.file_size,
            user_id: doc.user_id,
            uploaded_at: Utc::now(),
        };
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentWithLatest>, StoreError> {
        let documents = self.documents.read().await;
        let analyses = self.analyses.read().await;
        Ok(documents
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id)
            .map(|d| DocumentWithLatest {
                document: d.clone(),
                analyses: analyses
                    .iter()
                    .rev()
                    .find(|a| a.document_id == d.id)
                    .cloned()
                    .into_iter()
                    .collect(),
            })
            .collect())
    }

    async fn insert_analysis(&self, analysis: NewAnalysis) -> Result<Analysis, StoreError> {
        let analysis = Analysis {
            id: Uuid::new_v4(),
            document_id: analysis.document_id,
            user_id: analysis.user_id,
            record: analysis.record,
            created_at: Utc::now(),
        };
        self.analyses.write().await.push(analysis.clone());
        Ok(analysis)
    }

    async fn list_analyses(
        &self,
        document_id: DocumentId,
        user_id: &str,
    ) -> Result<Vec<Analysis>, StoreError> {
        let analyses = self.analyses.read().await;
        Ok(analyses
            .iter()
            .rev()
            .filter(|a| a.document_id == document_id && a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionProvider for MemoryStore {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }
}
