//! Shared application state for the feedmock server.
//!
//! [`AppState`] holds the immutable fixtures, the live feed
//! [`ConnectionRegistry`] and the handful of config values the handlers
//! need. It is wrapped in [`Arc`] and injected via Axum's `State`
//! extractor.

use std::path::PathBuf;
use std::sync::Arc;

use feedmock_core::config::AnimalsSection;
use feedmock_core::{ConnectionRegistry, FeedError, FeedmockConfig, Fixtures};

/// Shared state for the Axum application.
#[derive(Debug)]
pub struct AppState {
    /// Read-only fixtures shared by every handler and session.
    pub fixtures: Arc<Fixtures>,
    /// Live feed sessions.
    pub registry: ConnectionRegistry,
    /// Animal batch sizes.
    pub animals: AnimalsSection,
    /// Per-connection live feed queue capacity.
    pub queue_capacity: usize,
    /// Directory served for unmatched paths, if any.
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Build the state from loaded fixtures and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if the configured pacing
    /// window is inverted.
    pub fn new(fixtures: Arc<Fixtures>, config: &FeedmockConfig) -> Result<Self, FeedError> {
        Ok(Self {
            fixtures,
            registry: ConnectionRegistry::new(config.feed.pacing_window()?),
            animals: config.animals.clone(),
            queue_capacity: config.feed.queue_capacity,
            static_dir: config.server.static_dir.clone(),
        })
    }
}
