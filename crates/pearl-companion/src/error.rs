//! Error types for the pearl-companion crate.
//!
//! Simulation operations never fail: rejections are activity results, not
//! errors. The only fallible operation is validating a state that came from
//! outside the engine (a restored save).

/// Errors that can occur when checking companion state.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    /// A field is outside the range the engine maintains.
    #[error("invalid companion state: {reason}")]
    InvalidState {
        /// Which invariant the state breaks.
        reason: String,
    },
}
