//! Core entity structs for the Birdwatch backend.
//!
//! Covers the persisted entities ([`Owner`], [`ObservationRecord`]) and
//! the statistics report handed back to clients ([`StatsReport`],
//! [`SpeciesStats`]).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::OwnerKind;
use crate::ids::{ObservationId, OwnerId};

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// A registered account that owns observations.
///
/// The password is only ever held in its encoded form and is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    /// Unique identifier.
    pub id: OwnerId,
    /// Whether this is a user or an example account.
    pub kind: OwnerKind,
    /// Login name, unique within the owner kind.
    pub username: String,
    /// Contact address, unique within the owner kind.
    pub email: String,
    /// Encoded password as produced by the password encoder.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// A single species sighting recorded by an owner.
///
/// Only `species_code`, `family_code` and `timestamp` take part in
/// statistics; location and notes are carried for completeness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ObservationRecord {
    /// Database identity of the observation.
    pub id: ObservationId,
    /// Short species identifier (e.g. `eurrob1`).
    pub species_code: String,
    /// Short family identifier (e.g. `muscic1`).
    pub family_code: String,
    /// Free-form location description.
    pub location: String,
    /// When the sighting happened (naive local time).
    #[serde(rename = "dateTime")]
    pub timestamp: NaiveDateTime,
    /// Free-form notes.
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Per-species summary: how often it was seen and when it was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SpeciesStats {
    /// Species identifier.
    pub species_code: String,
    /// Family the species belongs to.
    pub family_code: String,
    /// Number of observations of this species.
    pub number_observations: u32,
    /// Timestamp of the most recent observation of this species.
    pub latest_observation: NaiveDateTime,
}

/// Aggregate statistics over all observations of one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StatsReport {
    /// Total number of observations.
    pub total_observations: u32,
    /// Number of distinct species codes.
    pub unique_species: u32,
    /// Number of distinct family codes.
    pub unique_families: u32,
    /// Mean gap between chronologically adjacent observations, human readable.
    pub average_time_between_observations: String,
    /// The species observed most often, if there are any observations.
    pub most_observed_species: Option<SpeciesStats>,
    /// Every species of the most observed family, most recently seen first.
    pub most_observed_family: Vec<SpeciesStats>,
}
