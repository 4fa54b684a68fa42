//! Engine, session clock, and orchestration for the Pearl companion.
//!
//! This crate owns the single mutable [`CompanionState`] and the
//! collaborators around it: the clock that supplies time, the random source,
//! the notification sink, and the store that persists the serialized state.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with system and manual clocks.
//! - [`config`] -- Configuration loading from `pearl-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`CompanionEngine`] and its builder.
//! - [`error`] -- Engine error types.
//! - [`notify`] -- [`NotificationSink`] trait and stock sinks.
//! - [`persistence`] -- [`StateStore`] trait with file and memory stores.
//! - [`runner`] -- The session tick loop and its pause/stop controls.
//!
//! [`CompanionState`]: pearl_types::CompanionState
//! [`Clock`]: clock::Clock
//! [`CompanionEngine`]: engine::CompanionEngine
//! [`NotificationSink`]: notify::NotificationSink
//! [`StateStore`]: persistence::StateStore

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod runner;

pub use engine::{CompanionEngine, EngineBuilder};
pub use error::EngineError;
