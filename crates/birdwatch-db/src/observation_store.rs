//! Observation persistence.
//!
//! Observations reference their owner through `user_id` or `example_id`
//! depending on the owner kind; exactly one of the two is set per row.

use birdwatch_types::{ObservationId, ObservationRecord, OwnerId, OwnerKind};
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::DbError;
use crate::routing::RoutingPool;

/// Operations on the `observations` table.
pub struct ObservationStore<'a> {
    pool: &'a RoutingPool,
}

impl<'a> ObservationStore<'a> {
    /// Create a new observation store bound to a routing pool.
    pub const fn new(pool: &'a RoutingPool) -> Self {
        Self { pool }
    }

    /// Load every observation of one owner, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_owner(
        &self,
        kind: OwnerKind,
        owner_id: OwnerId,
    ) -> Result<Vec<ObservationRecord>, DbError> {
        let sql = format!(
            r"SELECT id, species_code, family_code, location, date_time, notes
              FROM observations
              WHERE {} = $1",
            kind.observation_fk()
        );
        let rows = sqlx::query_as::<_, ObservationRow>(&sql)
            .bind(owner_id.into_inner())
            .fetch_all(self.pool.reader())
            .await?;

        tracing::debug!(%kind, %owner_id, count = rows.len(), "Loaded observations");

        Ok(rows.into_iter().map(ObservationRow::into_record).collect())
    }

    /// Insert an observation for one owner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails (including an
    /// unknown owner ID).
    pub async fn insert(
        &self,
        kind: OwnerKind,
        owner_id: OwnerId,
        record: &ObservationRecord,
    ) -> Result<(), DbError> {
        let sql = format!(
            r"INSERT INTO observations
                (id, {}, species_code, family_code, location, date_time, notes)
              VALUES ($1, $2, $3, $4, $5, $6, $7)",
            kind.observation_fk()
        );
        sqlx::query(&sql)
            .bind(record.id.into_inner())
            .bind(owner_id.into_inner())
            .bind(&record.species_code)
            .bind(&record.family_code)
            .bind(&record.location)
            .bind(record.timestamp)
            .bind(&record.notes)
            .execute(self.pool.writer())
            .await?;

        Ok(())
    }
}

/// A row from the `observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRow {
    /// Observation UUID.
    pub id: Uuid,
    /// Species identifier.
    pub species_code: String,
    /// Family identifier.
    pub family_code: String,
    /// Location description.
    pub location: String,
    /// When the sighting happened.
    pub date_time: NaiveDateTime,
    /// Free-form notes.
    pub notes: String,
}

impl ObservationRow {
    /// Convert into the shared record type.
    pub fn into_record(self) -> ObservationRecord {
        ObservationRecord {
            id: ObservationId::from(self.id),
            species_code: self.species_code,
            family_code: self.family_code,
            location: self.location,
            timestamp: self.date_time,
            notes: self.notes,
        }
    }
}
