//! Client for an OpenAI-compatible chat completions API.
//!
//! [`ChatClient::generate`] always returns a line Pearl can say: when the
//! client is unconfigured or the call fails in any way, the mood's fallback
//! line is returned instead and the failure is logged.

use pearl_types::Mood;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::fallback::{EMPTY_REPLY, fallback_line};
use crate::prompt::{ChatMessage, ChatStats, build_messages};

/// Talks to the chat-completion service on Pearl's behalf.
pub struct ChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a client for the given backend.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self, ChatError> {
        Ok(Self::new(ChatConfig::from_env()?))
    }

    /// The backend configuration.
    pub const fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Pearl's reply to the conversation so far. Never fails.
    pub async fn generate(
        &self,
        history: &[ChatMessage],
        mood: Mood,
        bond_level: u8,
        stats: &ChatStats,
    ) -> String {
        match self.complete(history, mood, bond_level, stats).await {
            Ok(reply) => reply,
            Err(ChatError::Unconfigured) => {
                debug!(mood = mood.as_str(), "chat backend unconfigured, using fallback");
                fallback_line(mood).to_owned()
            }
            Err(e) => {
                warn!(error = %e, mood = mood.as_str(), "chat request failed, using fallback");
                fallback_line(mood).to_owned()
            }
        }
    }

    /// Send one completion request and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Unconfigured`] without a key, and
    /// [`ChatError::Transport`], [`ChatError::Status`],
    /// [`ChatError::Malformed`] or [`ChatError::Timeout`] when the call fails.
    pub async fn complete(
        &self,
        history: &[ChatMessage],
        mood: Mood,
        bond_level: u8,
        stats: &ChatStats,
    ) -> Result<String, ChatError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ChatError::Unconfigured);
        };
        let body = request_body(&self.config, &build_messages(history, mood, bond_level, stats));

        let call = self.send(api_key, &body);
        let json = tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_elapsed| ChatError::Timeout {
                timeout_ms: self.config.timeout.as_millis(),
            })??;

        extract_openai_content(&json)
    }

    async fn send(
        &self,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ChatError> {
        let url = format!("{}/chat/completions", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ChatError::Malformed(e.to_string()))
    }
}

/// The JSON request body for one completion.
fn request_body(config: &ChatConfig, messages: &[ChatMessage]) -> serde_json::Value {
    serde_json::json!({
        "model": config.model,
        "messages": messages,
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
        "presence_penalty": config.presence_penalty,
        "frequency_penalty": config.frequency_penalty,
    })
}

/// Extract the reply from a chat completions response. Present but empty
/// content becomes [`EMPTY_REPLY`].
fn extract_openai_content(json: &serde_json::Value) -> Result<String, ChatError> {
    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            ChatError::Malformed("response missing choices[0].message.content".to_owned())
        })?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        Ok(EMPTY_REPLY.to_owned())
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn stats() -> ChatStats {
        ChatStats {
            hunger: 70.0,
            energy: 65.0,
            hygiene: 80.0,
            happiness: 60.0,
        }
    }

    #[test]
    fn extracts_trimmed_content() {
        let json = serde_json::json!({
            "choices": [{"message": {"content": "  Hi there! How was your day?\n"}}]
        });
        assert_eq!(
            extract_openai_content(&json).unwrap(),
            "Hi there! How was your day?"
        );
    }

    #[test]
    fn empty_content_becomes_placeholder() {
        let json = serde_json::json!({"choices": [{"message": {"content": "   "}}]});
        assert_eq!(extract_openai_content(&json).unwrap(), EMPTY_REPLY);
    }

    #[test]
    fn missing_choices_is_malformed() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(matches!(
            extract_openai_content(&json),
            Err(ChatError::Malformed(_))
        ));
    }

    #[test]
    fn body_carries_model_and_window() {
        let config = ChatConfig::default();
        let history: Vec<ChatMessage> = (0..12).map(|i| ChatMessage::user(i.to_string())).collect();
        let body = request_body(&config, &build_messages(&history, Mood::Happy, 2, &stats()));

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["messages"].as_array().unwrap().len(), 11);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "2");
    }

    #[tokio::test]
    async fn unconfigured_client_falls_back() {
        let client = ChatClient::new(ChatConfig::default());
        let history = [ChatMessage::user("hello")];

        let reply = client.generate(&history, Mood::Low, 0, &stats()).await;
        assert_eq!(reply, fallback_line(Mood::Low));

        let err = client
            .complete(&history, Mood::Low, 0, &stats())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Unconfigured));
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back() {
        let config = ChatConfig {
            api_url: "http://127.0.0.1:1".to_owned(),
            api_key: Some("sk-test".to_owned()),
            ..ChatConfig::default()
        };
        let client = ChatClient::new(config);

        let reply = client.generate(&[], Mood::Distressed, 4, &stats()).await;
        assert_eq!(reply, fallback_line(Mood::Distressed));
    }
}
