//! Mock backend binary for the photo-sharing and pet demo front-ends.
//!
//! Loads configuration and fixtures, then serves the REST endpoints and
//! the paced live feed `WebSocket` until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `feedmock-config.yaml` (or `FEEDMOCK_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load fixtures (embedded, or from `fixtures.dir`)
//! 4. Build the shared application state
//! 5. Serve until `Ctrl-C`, closing every live feed session on the way out

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use feedmock_core::config::DEFAULT_CONFIG_FILE;
use feedmock_core::{FeedmockConfig, Fixtures};
use feedmock_server::{AppState, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "FEEDMOCK_CONFIG";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it below.
    let (path, explicit) = config_path();
    let (config, from_file) = load_config(&path, explicit)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("feedmock starting");
    if from_file {
        info!(path = %path.display(), "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        min_delay_ms = config.feed.min_delay_ms,
        max_delay_ms = config.feed.max_delay_ms,
        "Configuration resolved"
    );

    // 3. Load fixtures.
    let fixtures = match &config.fixtures.dir {
        Some(dir) => Fixtures::from_dir(dir)?,
        None => Fixtures::embedded()?,
    };
    info!(
        feed = fixtures.picshare.feed.len(),
        live_feed = fixtures.picshare.ws_feed.len(),
        dog_names = fixtures.dog_names.len(),
        cat_names = fixtures.cat_names.len(),
        "Fixtures ready"
    );

    // 4. Build application state.
    let state = Arc::new(AppState::new(Arc::new(fixtures), &config)?);

    // 5. Serve.
    start_server(&config.server, state).await?;

    info!("feedmock stopped");
    Ok(())
}

/// The config file to read and whether it was named explicitly.
fn config_path() -> (PathBuf, bool) {
    std::env::var_os(CONFIG_ENV).map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |path| (PathBuf::from(path), true),
    )
}

/// Load configuration from `path`.
///
/// A missing default file falls back to defaults (with the `PORT`
/// override still applied); an explicitly named file must exist.
fn load_config(path: &Path, required: bool) -> Result<(FeedmockConfig, bool), AppError> {
    if required || path.exists() {
        Ok((FeedmockConfig::from_file(path)?, true))
    } else {
        let mut config = FeedmockConfig::default();
        config.server.apply_env_overrides();
        Ok((config, false))
    }
}
