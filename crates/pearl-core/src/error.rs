//! Error types for the engine.

use pearl_companion::CompanionError;

use crate::persistence::StoreError;

/// Errors from engine operations that cross a boundary (serialization,
/// restore, storage). Simulation calls never fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The state could not be encoded or the blob could not be decoded.
    #[error("state serialization failed: {source}")]
    Serialization {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A decoded state broke an invariant.
    #[error("restored state rejected: {source}")]
    InvalidState {
        /// What was wrong with it.
        #[from]
        source: CompanionError,
    },

    /// The state store failed.
    #[error("state store failed: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}
