//! Error types for the chat collaborator.
//!
//! These never reach a caller of [`ChatClient::generate`]; every variant
//! ends in a fallback line. They surface from the lower-level
//! [`ChatClient::complete`] and from configuration loading.
//!
//! [`ChatClient::generate`]: crate::client::ChatClient::generate
//! [`ChatClient::complete`]: crate::client::ChatClient::complete

/// Errors that can occur while talking to the chat-completion service.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// No API key is configured.
    #[error("chat backend is not configured")]
    Unconfigured,

    /// Configuration is invalid.
    #[error("chat config error: {0}")]
    Config(String),

    /// The request could not be sent or the body could not be read.
    #[error("chat request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("chat service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("chat response malformed: {0}")]
    Malformed(String),

    /// The request did not finish before the deadline.
    #[error("chat request exceeded {timeout_ms} ms")]
    Timeout {
        /// The deadline that was exceeded.
        timeout_ms: u128,
    },
}
