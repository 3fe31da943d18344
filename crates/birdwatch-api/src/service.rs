//! Owner service: registration, updates, observations and statistics.
//!
//! A single service serves both owner kinds. Handlers build an
//! [`OwnerService`] per request from the shared [`AppState`] and the
//! route's [`OwnerKind`].

use birdwatch_types::{
    CreateOwnerRequest, NewObservation, ObservationId, ObservationRecord, Owner, OwnerId,
    OwnerKind, StatsReport, UpdateOwnerRequest,
};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// Business operations on the owners of one kind.
#[derive(Debug, Clone, Copy)]
pub struct OwnerService<'a> {
    state: &'a AppState,
    kind: OwnerKind,
}

impl<'a> OwnerService<'a> {
    /// Create a service for owners of `kind`.
    pub const fn new(state: &'a AppState, kind: OwnerKind) -> Self {
        Self { state, kind }
    }

    /// Register a new owner.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for blank fields or a malformed email.
    /// - [`ApiError::Conflict`] when the username or email is taken.
    pub async fn register(&self, request: CreateOwnerRequest) -> Result<Owner, ApiError> {
        request.validate()?;
        let repo = &self.state.repository;

        if repo.exists_by_username(self.kind, &request.username).await? {
            return Err(ApiError::Conflict(format!(
                "username {} is already in use",
                request.username
            )));
        }
        if repo.exists_by_email(self.kind, &request.email).await? {
            return Err(ApiError::Conflict(format!(
                "email {} is already in use",
                request.email
            )));
        }

        let password_hash = self.state.encode_password(request.password).await?;
        let owner = Owner {
            id: OwnerId::new(),
            kind: self.kind,
            username: request.username,
            email: request.email,
            password_hash,
        };
        repo.insert(owner.clone()).await?;

        tracing::info!(kind = %self.kind, owner_id = %owner.id, username = %owner.username, "Registered owner");
        Ok(owner)
    }

    /// Apply the non-blank fields of `request` to an existing owner.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] when nothing would change or the email is
    ///   malformed.
    /// - [`ApiError::NotFound`] when no owner has `owner_id`.
    /// - [`ApiError::Conflict`] when the new username or email is taken.
    pub async fn update(
        &self,
        owner_id: OwnerId,
        request: &UpdateOwnerRequest,
    ) -> Result<Owner, ApiError> {
        request.validate()?;
        if request.is_empty() {
            return Err(ApiError::Validation(String::from(
                "invalid or missing input data",
            )));
        }

        let repo = &self.state.repository;
        let not_found = || ApiError::NotFound(format!("owner with id {owner_id} not found"));
        let mut owner = repo
            .find_by_id(self.kind, owner_id)
            .await?
            .ok_or_else(not_found)?;

        if let Some(username) = request.username() {
            username.clone_into(&mut owner.username);
        }
        if let Some(email) = request.email() {
            email.clone_into(&mut owner.email);
        }
        if let Some(password) = request.password() {
            owner.password_hash = self.state.encode_password(password.to_owned()).await?;
        }

        if !repo.update(owner.clone()).await? {
            return Err(not_found());
        }

        tracing::info!(kind = %self.kind, owner_id = %owner.id, username = %owner.username, "Updated owner");
        Ok(owner)
    }

    /// Compute statistics over every observation of the named owner.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the owner disappeared after
    /// authentication.
    pub async fn stats(&self, username: &str) -> Result<StatsReport, ApiError> {
        let repo = &self.state.repository;
        let owner = repo
            .find_by_username(self.kind, username)
            .await?
            .ok_or_else(|| ApiError::NotFound(String::from("logged-in owner not found")))?;

        let observations = repo.observations(self.kind, owner.id).await?;
        tracing::debug!(
            kind = %self.kind,
            owner_id = %owner.id,
            count = observations.len(),
            "Aggregating observations"
        );
        Ok(birdwatch_stats::aggregate(&observations))
    }

    /// Record a sighting for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for blank codes or location.
    pub async fn record_observation(
        &self,
        owner: &Owner,
        observation: NewObservation,
    ) -> Result<ObservationRecord, ApiError> {
        observation.validate()?;

        let record = ObservationRecord {
            id: ObservationId::new(),
            species_code: observation.species_code,
            family_code: observation.family_code,
            location: observation.location,
            timestamp: observation.date_time,
            notes: observation.notes,
        };
        self.state
            .repository
            .add_observation(self.kind, owner.id, record.clone())
            .await?;

        tracing::info!(
            kind = %self.kind,
            owner_id = %owner.id,
            species = %record.species_code,
            "Recorded observation"
        );
        Ok(record)
    }
}
