//! Chat backend configuration loaded from the environment.
//!
//! Variables:
//! - `PEARL_CHAT_API_KEY` -- API key; without it the client only answers
//!   with fallback lines
//! - `PEARL_CHAT_API_URL` -- base URL of an OpenAI-compatible API
//!   (default `https://api.openai.com/v1`)
//! - `PEARL_CHAT_MODEL` -- model name (default `gpt-4o-mini`)
//! - `PEARL_CHAT_TIMEOUT_MS` -- request deadline in milliseconds (default 10000)

use std::time::Duration;

use crate::error::ChatError;

/// Default base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default request deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings for the chat-completion backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// API key. `None` disables remote calls.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Deadline for one request, including reading the body.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f64,
    /// Reply length cap in tokens.
    pub max_tokens: u32,
    /// Penalty for repeating topics.
    pub presence_penalty: f64,
    /// Penalty for repeating words.
    pub frequency_penalty: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            temperature: 0.8,
            max_tokens: 150,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        }
    }
}

impl ChatConfig {
    /// Load from the process environment. Unset variables keep their
    /// defaults; an empty API key counts as unset.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChatError> {
        let mut config = Self::default();

        if let Some(url) = lookup("PEARL_CHAT_API_URL") {
            config.api_url = url.trim_end_matches('/').to_owned();
        }
        config.api_key = lookup("PEARL_CHAT_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(model) = lookup("PEARL_CHAT_MODEL") {
            config.model = model;
        }
        if let Some(raw) = lookup("PEARL_CHAT_TIMEOUT_MS") {
            let ms: u64 = raw
                .parse()
                .map_err(|e| ChatError::Config(format!("invalid PEARL_CHAT_TIMEOUT_MS: {e}")))?;
            config.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Whether remote calls are possible.
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ChatConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ChatConfig::default());
        assert!(!config.is_configured());
    }

    #[test]
    fn variables_override_defaults() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("PEARL_CHAT_API_URL", "http://localhost:11434/v1/"),
            ("PEARL_CHAT_API_KEY", "sk-test"),
            ("PEARL_CHAT_MODEL", "llama3"),
            ("PEARL_CHAT_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:11434/v1");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.is_configured());
    }

    #[test]
    fn blank_key_is_unset() {
        let config = ChatConfig::from_lookup(lookup(&[("PEARL_CHAT_API_KEY", "  ")])).unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let result = ChatConfig::from_lookup(lookup(&[("PEARL_CHAT_TIMEOUT_MS", "soon")]));
        assert!(matches!(result, Err(ChatError::Config(_))));
    }
}
