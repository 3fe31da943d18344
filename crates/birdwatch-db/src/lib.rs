//! Data layer for the Birdwatch backend (`PostgreSQL`).
//!
//! Statements are routed by intent: writes go to the primary, reads go to
//! a replica when one is configured.
//!
//! ```text
//! Service layer
//!     |
//!     +-- OwnerStore       (users / examples, per OwnerKind)
//!     +-- ObservationStore (observations of one owner)
//!             |
//!             RoutingPool --+-- writer() --> primary
//!                           +-- reader() --> replica
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool configuration and migrations
//! - [`routing`] -- Primary/replica routing
//! - [`owner_store`] -- Owner lookups, inserts and updates
//! - [`observation_store`] -- Observation listing and inserts
//! - [`error`] -- Shared error types

pub mod error;
pub mod observation_store;
pub mod owner_store;
pub mod postgres;
pub mod routing;

// Re-export primary types for convenience.
pub use error::DbError;
pub use observation_store::{ObservationRow, ObservationStore};
pub use owner_store::{OwnerRow, OwnerStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use routing::{Route, RoutingPool};
