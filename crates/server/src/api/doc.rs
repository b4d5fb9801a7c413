//! OpenAPI document served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "legalyze API",
        version = "0.1.0",
        description = "Upload legal documents and get AI-generated summaries, key clauses, legal terms, and risk factors.",
    ),
    tags(
        (name = "Health", description = "Server liveness"),
        (name = "Documents", description = "Document upload and listing"),
        (name = "Analysis", description = "LLM analysis of stored documents"),
        (name = "Text", description = "Ad-hoc simplification and key-phrase extraction"),
    ),
    paths(
        crate::api::health::health,
        crate::api::documents::upload_document,
        crate::api::documents::list_documents,
        crate::api::analyze::analyze_document,
        crate::api::analyze::list_analyses,
        crate::api::text::simplify,
        crate::api::text::key_phrases,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::documents::UploadedDocument,
        crate::api::documents::UploadResponse,
        crate::api::documents::DocumentListResponse,
        crate::api::analyze::AnalyzeRequest,
        crate::api::analyze::AnalysisView,
        crate::api::analyze::AnalyzeResponse,
        crate::api::analyze::AnalysisListResponse,
        crate::api::text::TextRequest,
        crate::api::text::SimplifyResponse,
        crate::api::text::KeyPhrasesResponse,
    ))
)]
pub struct ApiDoc;
