//! Error types for sampling, pacing and feed sessions.

/// Errors raised by the feed engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// A caller supplied an unusable argument (empty pool, inverted
    /// pacing window).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The consumer side of a feed session went away.
    ///
    /// Never escapes the owning session: the sink logs it and closes
    /// the session.
    #[error("connection closed")]
    ConnectionClosed,
}
