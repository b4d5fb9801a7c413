pub mod openai;

use std::sync::Arc;

use legalyze_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat-completion provider from config.
///
/// A missing API key is an error: the analysis service cannot start without one.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let api_key = llm_config
        .api_key
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("LLM_API_KEY not set".into()))?;
    let provider = openai::OpenAiCompatibleProvider::new(
        api_key.clone(),
        llm_config.model.clone(),
        llm_config.api_url.clone(),
        std::time::Duration::from_secs(llm_config.timeout_secs),
    )?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(String::from),
            api_url: "https://api.x.ai/v1".into(),
            model: "grok-beta".into(),
            temperature: 0.2,
            max_tokens: 2000,
            timeout_secs: 30,
        }
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = create_provider(&config(None)).err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn key_present_builds_provider() {
        assert!(create_provider(&config(Some("xai-test"))).is_ok());
    }
}
