//! Conversation collaborator for the Pearl companion.
//!
//! Pearl's chat replies come from an external OpenAI-compatible chat
//! completions service. This crate builds the request from her current
//! mood, bond level, and physical state, and answers with a mood-keyed
//! fallback line whenever the service is unconfigured or unavailable.
//!
//! # Modules
//!
//! - [`client`] -- [`ChatClient`] and the HTTP call.
//! - [`config`] -- Backend settings loaded from `PEARL_CHAT_*` variables.
//! - [`error`] -- Error types.
//! - [`fallback`] -- Canned replies per mood.
//! - [`prompt`] -- Chat messages and the system prompt.
//!
//! [`ChatClient`]: client::ChatClient

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod prompt;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use error::ChatError;
pub use prompt::{ChatMessage, ChatRole, ChatStats};
