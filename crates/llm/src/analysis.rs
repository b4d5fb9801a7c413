//! Legal document analysis over an injected chat-completion provider.

use std::borrow::Cow;
use std::sync::Arc;

use legalyze_core::config::LlmConfig;
use legalyze_core::AnalysisRecord;
use tracing::{info, warn};

use crate::normalize::{normalize, strip_code_fence};
use crate::provider::{CompletionRequest, LlmError, LlmProvider, Message};

/// Character budget for document text sent to the model.
pub const MAX_CONTENT_CHARS: usize = 5000;

pub const TRUNCATION_NOTICE: &str = "\n\n[Document truncated due to length. Please upload smaller \
documents or analyze specific sections for complete analysis.]";

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a legal document analysis AI. You MUST respond ONLY with valid JSON - no additional text, explanations, or commentary.

CRITICAL: Your response must be ONLY a JSON object with this exact structure:
{
  "summary": "Brief overview of the document in plain language",
  "keyClauses": [{"clause": "clause text", "position": "section reference", "explanation": "plain language explanation", "importance": "high"}],
  "legalTerms": [{"term": "legal term", "definition": "formal definition", "simplifiedExplanation": "easy explanation"}],
  "riskFactors": [{"risk": "identified risk", "severity": "high", "explanation": "what this means"}]
}

"importance" and "severity" must be one of "high", "medium" or "low".
If the document is unclear, still return valid JSON with a summary explaining the limitation. Never respond with plain text or markdown."#;

const KEY_PHRASES_SYSTEM_PROMPT: &str = "Extract the most important legal phrases and terms from \
the provided text. Return as a JSON array of strings.";

const SIMPLIFY_SYSTEM_PROMPT: &str = "You are a legal translator. Convert complex legal language \
into simple, everyday language that non-legal professionals can understand.";

const KEY_PHRASES_TEMPERATURE: f32 = 0.2;
const KEY_PHRASES_MAX_TOKENS: u32 = 500;
const SIMPLIFY_TEMPERATURE: f32 = 0.3;
const SIMPLIFY_MAX_TOKENS: u32 = 1000;

/// Sampling parameters for the main analysis call.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self { temperature: 0.2, max_tokens: 2000 }
    }
}

impl From<&LlmConfig> for AnalysisSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Cut `text` to [`MAX_CONTENT_CHARS`] characters and append the truncation notice.
pub fn truncate_for_analysis(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            info!(
                "Document too long ({} chars), truncating to {} chars",
                text.chars().count(),
                MAX_CONTENT_CHARS
            );
            Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_NOTICE))
        }
    }
}

/// Issues analysis requests. Holds no mutable state; share it behind an `Arc`.
pub struct AnalysisService {
    provider: Arc<dyn LlmProvider>,
    settings: AnalysisSettings,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: AnalysisSettings) -> Self {
        Self { provider, settings }
    }

    /// Build from config; fails when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(config)?;
        Ok(Self::new(provider, AnalysisSettings::from(config)))
    }

    /// Analyse a document's text. Exactly one provider call, no retries.
    ///
    /// Transport and provider failures are returned; unparseable output is not
    /// an error and yields [`AnalysisRecord::fallback`].
    pub async fn analyze(&self, document_text: &str) -> Result<AnalysisRecord, LlmError> {
        let content = truncate_for_analysis(document_text);
        let request = CompletionRequest {
            messages: vec![
                Message::system(ANALYSIS_SYSTEM_PROMPT),
                Message::user(format!(
                    "Please analyze the following legal document:\n\n{}",
                    content
                )),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            json_response: true,
        };

        let raw = self.provider.complete(request).await?;
        let record = normalize(&raw);
        info!(
            "Analysis complete: {} clauses, {} terms, {} risks",
            record.key_clauses.len(),
            record.legal_terms.len(),
            record.risk_factors.len()
        );
        Ok(record)
    }

    /// Ask the model for the notable legal phrases in `text`.
    /// Output that is not a JSON string array yields an empty list.
    pub async fn extract_key_phrases(&self, text: &str) -> Result<Vec<String>, LlmError> {
        let request = CompletionRequest {
            messages: vec![Message::system(KEY_PHRASES_SYSTEM_PROMPT), Message::user(text)],
            temperature: KEY_PHRASES_TEMPERATURE,
            max_tokens: KEY_PHRASES_MAX_TOKENS,
            json_response: false,
        };

        let raw = self.provider.complete(request).await?;
        match serde_json::from_str::<Vec<String>>(strip_code_fence(&raw)) {
            Ok(phrases) => Ok(phrases),
            Err(e) => {
                warn!("Failed to parse key phrases response as JSON: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Rewrite legal language in plain terms.
    pub async fn simplify_legal_text(&self, text: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            messages: vec![Message::system(SIMPLIFY_SYSTEM_PROMPT), Message::user(text)],
            temperature: SIMPLIFY_TEMPERATURE,
            max_tokens: SIMPLIFY_MAX_TOKENS,
            json_response: false,
        };
        match self.provider.complete(request).await {
            Err(LlmError::EmptyResponse) => {
                warn!("Simplification returned no content");
                Ok(String::new())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Provider stub that records requests and replays a canned reply.
    struct StubProvider {
        /// `Err(None)` stands for a reply with no content.
        reply: Result<String, Option<u16>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(reply.to_string()), requests: Mutex::new(Vec::new()) })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { reply: Err(Some(status)), requests: Mutex::new(Vec::new()) })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self { reply: Err(None), requests: Mutex::new(Vec::new()) })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(Some(status)) => Err(LlmError::ApiError {
                    status: *status,
                    message: "upstream unavailable".into(),
                }),
                Err(None) => Err(LlmError::EmptyResponse),
            }
        }
    }

    fn service(provider: Arc<StubProvider>) -> AnalysisService {
        AnalysisService::new(provider, AnalysisSettings::default())
    }

    #[test]
    fn short_text_untouched() {
        let text = "a".repeat(MAX_CONTENT_CHARS);
        assert!(matches!(truncate_for_analysis(&text), Cow::Borrowed(_)));
        assert_eq!(truncate_for_analysis("short"), "short");
    }

    #[test]
    fn long_text_truncated_by_chars() {
        // Multi-byte characters: the cut must land on a char boundary.
        let text = "é".repeat(MAX_CONTENT_CHARS + 10);
        let out = truncate_for_analysis(&text);
        assert!(out.ends_with(TRUNCATION_NOTICE));
        let body = out.strip_suffix(TRUNCATION_NOTICE).unwrap();
        assert_eq!(body.chars().count(), MAX_CONTENT_CHARS);
    }

    #[tokio::test]
    async fn analyze_sends_one_json_mode_request() {
        let stub = StubProvider::replying(
            r#"{"summary":"A lease.","keyClauses":[],"legalTerms":[],"riskFactors":[]}"#,
        );
        let record = service(stub.clone())
            .analyze("This is a simple lease agreement.")
            .await
            .unwrap();
        assert_eq!(record.summary, "A lease.");

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert!(req.json_response);
        assert_eq!(req.max_tokens, 2000);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.messages.len(), 2);
        assert!(req.messages[0].content.contains("ONLY a JSON object"));
        assert!(req.messages[1].content.ends_with("This is a simple lease agreement."));
    }

    #[tokio::test]
    async fn analyze_truncates_long_documents() {
        let stub = StubProvider::replying(r#"{"summary":"Long."}"#);
        let text = "x".repeat(MAX_CONTENT_CHARS * 2);
        service(stub.clone()).analyze(&text).await.unwrap();
        let user = &stub.requests()[0].messages[1].content;
        assert!(user.ends_with(TRUNCATION_NOTICE));
        assert_eq!(user.matches('x').count(), MAX_CONTENT_CHARS);
    }

    #[tokio::test]
    async fn analyze_falls_back_on_garbage() {
        let stub = StubProvider::replying("The document seems to be a lease.");
        let record = service(stub).analyze("lease").await.unwrap();
        assert_eq!(record, AnalysisRecord::fallback());
    }

    #[tokio::test]
    async fn analyze_propagates_provider_errors_without_retry() {
        let stub = StubProvider::failing(503);
        let err = service(stub.clone()).analyze("lease").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 503, .. }));
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn key_phrases_parsed_or_empty() {
        let stub = StubProvider::replying("```json\n[\"force majeure\", \"indemnity\"]\n```");
        let phrases = service(stub.clone()).extract_key_phrases("text").await.unwrap();
        assert_eq!(phrases, vec!["force majeure", "indemnity"]);
        let req = &stub.requests()[0];
        assert_eq!(req.max_tokens, 500);
        assert!(!req.json_response);

        let stub = StubProvider::replying("force majeure, indemnity");
        let phrases = service(stub).extract_key_phrases("text").await.unwrap();
        assert!(phrases.is_empty());
    }

    #[tokio::test]
    async fn simplify_returns_raw_text() {
        let stub = StubProvider::replying("You must pay rent every month.");
        let out = service(stub.clone())
            .simplify_legal_text("Lessee shall remit rent monthly.")
            .await
            .unwrap();
        assert_eq!(out, "You must pay rent every month.");
        let req = &stub.requests()[0];
        assert_eq!(req.max_tokens, 1000);
        assert!((req.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn simplify_without_content_is_empty_text() {
        let out = service(StubProvider::empty()).simplify_legal_text("text").await.unwrap();
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn analyze_without_content_is_an_error() {
        let err = service(StubProvider::empty()).analyze("lease").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncation_is_exact(len in 0usize..12_000) {
                let text = "ab".repeat(len / 2 + 1)[..len].to_string();
                let out = truncate_for_analysis(&text);
                if len <= MAX_CONTENT_CHARS {
                    prop_assert_eq!(&*out, text.as_str());
                } else {
                    let body = out.strip_suffix(TRUNCATION_NOTICE).unwrap();
                    prop_assert_eq!(body, &text[..MAX_CONTENT_CHARS]);
                }
            }
        }
    }
}
