//! Shared type definitions for the feedmock backend.
//!
//! Records defined here are what the REST endpoints return and what the
//! live feed pushes. Types flow downstream to `TypeScript` via `ts-rs` so
//! the example front-ends can check their decoders against them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for animals and feed sessions
//! - [`enums`] -- Animal kind and sex
//! - [`structs`] -- Photo, account and animal records

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{AnimalKind, Sex};
pub use ids::{AnimalId, SessionId};
pub use structs::{Account, Animal, Photo};
