use std::sync::Arc;

use legalyze_ingest::ContentExtractor;
use legalyze_llm::AnalysisService;

use crate::auth::SessionProvider;
use crate::store::DocumentStore;

/// Shared, read-only request context. Everything mutable lives behind the store.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub extractor: ContentExtractor,
    pub analysis: AnalysisService,
}
