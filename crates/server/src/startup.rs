//! Server startup: shared state initialization.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use legalyze_core::Config;
use legalyze_ingest::{ContentExtractor, TesseractOcr};
use legalyze_llm::AnalysisService;

use crate::auth::SessionProvider;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryStore, PgStore};

/// Build `AppState` from configuration.
///
/// A missing LLM key is fatal. PostgreSQL is used when configured; a
/// configured database that cannot be reached is fatal too.
pub async fn build_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let analysis = AnalysisService::from_config(&config.llm)
        .context("LLM provider is required to analyze documents")?;
    info!("LLM provider ready (model: {})", config.llm.model);

    let extractor = ContentExtractor::new(Arc::new(TesseractOcr::new(config.ocr.clone())));

    let (store, sessions): (Arc<dyn DocumentStore>, Arc<dyn SessionProvider>) =
        if config.postgres.is_configured() {
            let pg = Arc::new(
                PgStore::connect(&config.postgres)
                    .await
                    .context("failed to connect to PostgreSQL")?,
            );
            let store: Arc<dyn DocumentStore> = pg.clone();
            let sessions: Arc<dyn SessionProvider> = pg;
            (store, sessions)
        } else {
            warn!("PostgreSQL not configured (PG_USERNAME unset), using in-memory store; data is lost on restart");
            let memory = Arc::new(MemoryStore::with_sessions(config.auth.dev_tokens.clone()));
            let store: Arc<dyn DocumentStore> = memory.clone();
            let sessions: Arc<dyn SessionProvider> = memory;
            (store, sessions)
        };

    if !config.auth.dev_tokens.is_empty() && config.postgres.is_configured() {
        warn!("DEV_SESSION_TOKENS ignored: sessions are read from PostgreSQL");
    }

    Ok(Arc::new(AppState {
        store,
        sessions,
        extractor,
        analysis,
    }))
}
