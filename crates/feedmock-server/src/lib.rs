//! HTTP and `WebSocket` surface of the feedmock backend.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Live feed `WebSocket`** (`/` and `/ws/feed`): each connection
//!   receives the `wsFeed` photos in its own random order, one at a time
//!   with a randomized pause before each
//! - **Animal endpoints** (`/animals*`) generating mock pet records
//! - **Picshare endpoints** (`/feed`, `/badfeed`, `/user/{username}/feed`,
//!   `/account`) serving fixtures
//! - **Echo endpoint** (`POST /salad/send`) with an opt-in failure mode
//!
//! # Architecture
//!
//! Handlers read from immutable [`Fixtures`](feedmock_core::Fixtures)
//! shared through [`AppState`]. Live feed sessions are tracked by the
//! state's [`ConnectionRegistry`](feedmock_core::ConnectionRegistry), so
//! a disconnect or server shutdown cancels the pending timers of the
//! affected sessions.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, serve, start_server};
pub use state::AppState;
