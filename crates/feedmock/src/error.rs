//! Error types for the feedmock binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the feedmock binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: feedmock_core::ConfigError,
    },

    /// Fixture loading failed.
    #[error("fixture error: {source}")]
    Fixture {
        /// The underlying fixture error.
        #[from]
        source: feedmock_core::FixtureError,
    },

    /// Application state could not be built from the configuration.
    #[error("feed error: {source}")]
    Feed {
        /// The underlying feed error.
        #[from]
        source: feedmock_core::FeedError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: feedmock_server::ServerError,
    },
}
