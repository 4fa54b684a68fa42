//! Error types for the session host binary.

/// Top-level error for the session host.
///
/// Only startup can fail; once the session is running, storage failures are
/// logged and the session continues in memory.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: pearl_core::config::ConfigError,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
