//! Observation statistics for the Birdwatch backend.
//!
//! This crate turns the full observation history of a single owner into a
//! [`StatsReport`]. Everything here is pure and synchronous: no I/O, no
//! shared state, no failure modes. Callers load the observations, hand
//! them over, and serialize the returned report.
//!
//! # Modules
//!
//! - [`duration`] -- Human-readable rendering of time spans
//!   (`"1 day 2 hours 5 seconds"`).
//! - [`aggregate`] -- Counts, average gap, most observed species and the
//!   species breakdown of the most observed family.
//!
//! [`StatsReport`]: birdwatch_types::StatsReport

pub mod aggregate;
pub mod duration;

pub use aggregate::{SpeciesTally, aggregate, average_gap};
pub use duration::format_duration;
