use super::ReplyEngine;
use crate::config::EngineConfig;
use crate::conversation::ConversationHistory;
use crate::error::EngineError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Reply engine backed by an Ollama server's chat endpoint.
pub struct OllamaReplyEngine {
    client: Client,
    config: EngineConfig,
}

impl OllamaReplyEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180)) // local reasoning models are slow
            .build()?;

        log::info!(
            "🧠 Reply engine: model '{}' at {}",
            config.model,
            config.base_url
        );

        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReplyEngine for OllamaReplyEngine {
    async fn infer(&self, history: &ConversationHistory) -> Result<String, EngineError> {
        log::debug!("🧠 Sending {}", history.summary());

        let payload = json!({
            "model": self.config.model,
            "messages": history,
            "stream": false
        });

        let mut request = self.client.post(self.chat_url()).json(&payload);
        if let Some(key) = self.config.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EngineError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EngineError::ParseError(e.to_string()))?;

        if let Some(error) = body["error"].as_str() {
            return Err(EngineError::Unavailable(error.to_string()));
        }

        let content = body["message"]["content"]
            .as_str()
            .ok_or_else(|| EngineError::ParseError("No message content in response".to_string()))?;

        log::debug!("🧠 Raw reply: {:?}", content);
        Ok(content.to_string())
    }
}
