//! Feed engine and synthetic data generator for the feedmock backend.
//!
//! # Modules
//!
//! - [`sampler`] -- [`UniqueSampler`]: cycling draw-without-replacement
//! - [`shuffle`] -- one full random permutation per call
//! - [`pacing`] -- delay scheduler with [`CancelHandle`] cancellation
//! - [`session`] -- [`FeedSession`] lifecycle and [`ConnectionRegistry`]
//! - [`animals`] -- [`AnimalGenerator`] over the fixture name/breed pools
//! - [`fixtures`] -- immutable fixture data loaded once at startup
//! - [`config`] -- `feedmock-config.yaml` loading
//! - [`error`] -- [`FeedError`]
//!
//! # Architecture
//!
//! Fixtures are read-only and shared. Each live feed connection owns a
//! private permutation and random generator, so sessions never share
//! mutable state; the registry is locked only when sessions open or
//! close.

pub mod animals;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod pacing;
pub mod sampler;
pub mod session;
pub mod shuffle;

pub use animals::AnimalGenerator;
pub use config::{ConfigError, FeedmockConfig};
pub use error::FeedError;
pub use fixtures::{FixtureError, Fixtures};
pub use pacing::{CancelHandle, FeedSink, PacingOutcome, PacingWindow};
pub use sampler::UniqueSampler;
pub use session::{ChannelSink, ConnectionRegistry, FeedSession, SessionState};
