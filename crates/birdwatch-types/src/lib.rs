//! Shared type definitions for the Birdwatch backend.
//!
//! This crate is the single source of truth for the types used across the
//! workspace. Response types flow downstream to `TypeScript` via `ts-rs`
//! for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for owner and observation identifiers
//! - [`enums`] -- [`OwnerKind`], the user/example split
//! - [`structs`] -- Owners, observations and the statistics report
//! - [`requests`] -- Validated request payloads

pub mod enums;
pub mod ids;
pub mod requests;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::OwnerKind;
pub use ids::{ObservationId, OwnerId};
pub use requests::{CreateOwnerRequest, NewObservation, UpdateOwnerRequest};
pub use structs::{ObservationRecord, Owner, SpeciesStats, StatsReport};
