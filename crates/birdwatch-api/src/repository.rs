//! Owner repository abstraction.
//!
//! Uses enum dispatch instead of trait objects because async methods are
//! not dyn-compatible. The `PostgreSQL` variant delegates to the stores in
//! `birdwatch-db`, which route reads to the replica and writes to the
//! primary. The in-memory variant backs tests and development runs.

use std::sync::Arc;

use birdwatch_db::{DbError, ObservationStore, OwnerStore, RoutingPool};
use birdwatch_types::{ObservationRecord, Owner, OwnerId, OwnerKind};

use crate::memory::MemoryRepository;

/// Data-access collaborator for owners and their observations.
#[derive(Clone)]
pub enum OwnerRepository {
    /// `PostgreSQL` with primary/replica routing.
    Postgres(RoutingPool),
    /// Process-local storage.
    InMemory(Arc<MemoryRepository>),
}

impl OwnerRepository {
    /// Create an empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(MemoryRepository::new()))
    }

    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    /// Whether an owner of `kind` already uses `username`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup fails.
    pub async fn exists_by_username(&self, kind: OwnerKind, username: &str) -> Result<bool, DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, kind).exists_by_username(username).await,
            Self::InMemory(repo) => Ok(repo.find(kind, |o| o.username == username).await.is_some()),
        }
    }

    /// Whether an owner of `kind` already uses `email`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup fails.
    pub async fn exists_by_email(&self, kind: OwnerKind, email: &str) -> Result<bool, DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, kind).exists_by_email(email).await,
            Self::InMemory(repo) => Ok(repo.find(kind, |o| o.email == email).await.is_some()),
        }
    }

    /// Load an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup fails.
    pub async fn find_by_id(&self, kind: OwnerKind, id: OwnerId) -> Result<Option<Owner>, DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, kind).find_by_id(id).await,
            Self::InMemory(repo) => Ok(repo.find(kind, |o| o.id == id).await),
        }
    }

    /// Load an owner by username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup fails.
    pub async fn find_by_username(
        &self,
        kind: OwnerKind,
        username: &str,
    ) -> Result<Option<Owner>, DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, kind).find_by_username(username).await,
            Self::InMemory(repo) => Ok(repo.find(kind, |o| o.username == username).await),
        }
    }

    /// Persist a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] on a taken username or email.
    pub async fn insert(&self, owner: Owner) -> Result<(), DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, owner.kind).insert(&owner).await,
            Self::InMemory(repo) => repo.insert(owner).await,
        }
    }

    /// Persist changes to an existing owner. Returns `false` if it vanished.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] on a taken username or email.
    pub async fn update(&self, owner: Owner) -> Result<bool, DbError> {
        match self {
            Self::Postgres(pool) => OwnerStore::new(pool, owner.kind).update(&owner).await,
            Self::InMemory(repo) => repo.update(owner).await,
        }
    }

    /// Every observation of one owner, unordered.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup fails.
    pub async fn observations(
        &self,
        kind: OwnerKind,
        owner_id: OwnerId,
    ) -> Result<Vec<ObservationRecord>, DbError> {
        match self {
            Self::Postgres(pool) => ObservationStore::new(pool).list_for_owner(kind, owner_id).await,
            Self::InMemory(repo) => Ok(repo.observations(kind, owner_id).await),
        }
    }

    /// Record a new observation for one owner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the insert fails.
    pub async fn add_observation(
        &self,
        kind: OwnerKind,
        owner_id: OwnerId,
        record: ObservationRecord,
    ) -> Result<(), DbError> {
        match self {
            Self::Postgres(pool) => {
                ObservationStore::new(pool)
                    .insert(kind, owner_id, &record)
                    .await
            }
            Self::InMemory(repo) => {
                repo.add_observation(kind, owner_id, record).await;
                Ok(())
            }
        }
    }
}
