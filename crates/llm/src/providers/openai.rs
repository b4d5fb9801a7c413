use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{CompletionRequest, LlmError, LlmProvider};

/// Any endpoint speaking the OpenAI chat-completions dialect (OpenAI, xAI, Groq, ...).
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let api_messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": api_messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_response {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

/// Prefer the provider's `error.message`, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// Pull `choices[0].message.content` out of a completion response.
fn first_choice_content(resp: &serde_json::Value) -> Result<String, LlmError> {
    match resp["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        _ => Err(LlmError::EmptyResponse),
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);

        debug!("Chat completion request to {} (model={})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let resp: serde_json::Value = response.json().await?;
        first_choice_content(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(
            "key".into(),
            "grok-beta".into(),
            "https://api.x.ai/v1/".into(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn body_includes_json_mode_when_requested() {
        let p = provider();
        let request = CompletionRequest {
            messages: vec![Message::system("sys"), Message::user("hi")],
            temperature: 0.2,
            max_tokens: 2000,
            json_response: true,
        };
        let body = p.request_body(&request);
        assert_eq!(body["model"], "grok-beta");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["response_format"]["type"], "json_object");

        let plain = p.request_body(&CompletionRequest { json_response: false, ..request });
        assert!(plain.get("response_format").is_none());
    }

    #[test]
    fn trailing_slash_trimmed() {
        assert_eq!(provider().base_url, "https://api.x.ai/v1");
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            api_error_message(r#"{"error":{"message":"Incorrect API key"}}"#),
            "Incorrect API key"
        );
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn first_choice_content_requires_text() {
        let ok = json!({"choices": [{"message": {"content": "{\"summary\":\"x\"}"}}]});
        assert_eq!(first_choice_content(&ok).unwrap(), "{\"summary\":\"x\"}");

        let empty = json!({"choices": []});
        assert!(matches!(first_choice_content(&empty), Err(LlmError::EmptyResponse)));

        let blank = json!({"choices": [{"message": {"content": "  "}}]});
        assert!(matches!(first_choice_content(&blank), Err(LlmError::EmptyResponse)));
    }
}
