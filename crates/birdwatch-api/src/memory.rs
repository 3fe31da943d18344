//! In-memory owner and observation storage.
//!
//! Mirrors the uniqueness rules of the `PostgreSQL` schema so the service
//! layer behaves the same on either backend. Used by the test suite and by
//! `storage = "memory"` development runs.

use std::collections::BTreeMap;

use birdwatch_db::DbError;
use birdwatch_types::{ObservationRecord, Owner, OwnerId, OwnerKind};
use tokio::sync::RwLock;

/// Process-local storage for owners of both kinds and their observations.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    owners: RwLock<BTreeMap<(OwnerKind, OwnerId), Owner>>,
    observations: RwLock<BTreeMap<(OwnerKind, OwnerId), Vec<ObservationRecord>>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first owner of `kind` matching `predicate`.
    pub async fn find<F>(&self, kind: OwnerKind, predicate: F) -> Option<Owner>
    where
        F: Fn(&Owner) -> bool,
    {
        self.owners
            .read()
            .await
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, owner)| owner)
            .find(|owner| predicate(owner))
            .cloned()
    }

    /// Insert a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if the username or email is taken.
    pub async fn insert(&self, owner: Owner) -> Result<(), DbError> {
        let mut owners = self.owners.write().await;
        check_unique(&owners, &owner)?;
        owners.insert((owner.kind, owner.id), owner);
        Ok(())
    }

    /// Replace an existing owner. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if the new username or email is
    /// taken by another owner.
    pub async fn update(&self, owner: Owner) -> Result<bool, DbError> {
        let mut owners = self.owners.write().await;
        check_unique(&owners, &owner)?;
        match owners.get_mut(&(owner.kind, owner.id)) {
            Some(slot) => {
                *slot = owner;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// All observations of one owner.
    pub async fn observations(&self, kind: OwnerKind, owner_id: OwnerId) -> Vec<ObservationRecord> {
        self.observations
            .read()
            .await
            .get(&(kind, owner_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Append an observation to one owner's history.
    pub async fn add_observation(&self, kind: OwnerKind, owner_id: OwnerId, record: ObservationRecord) {
        self.observations
            .write()
            .await
            .entry((kind, owner_id))
            .or_default()
            .push(record);
    }
}

fn check_unique(
    owners: &BTreeMap<(OwnerKind, OwnerId), Owner>,
    candidate: &Owner,
) -> Result<(), DbError> {
    let table = candidate.kind.table();
    for owner in owners.values() {
        if owner.kind != candidate.kind || owner.id == candidate.id {
            continue;
        }
        if owner.username == candidate.username {
            return Err(DbError::UniqueViolation(format!("{table}_username_key")));
        }
        if owner.email == candidate.email {
            return Err(DbError::UniqueViolation(format!("{table}_email_key")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owner(kind: OwnerKind, username: &str, email: &str) -> Owner {
        Owner {
            id: OwnerId::new(),
            kind,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: String::from("x"),
        }
    }

    #[tokio::test]
    async fn usernames_are_unique_per_kind() {
        let repo = MemoryRepository::new();
        repo.insert(owner(OwnerKind::User, "kees", "kees@example.com"))
            .await
            .unwrap();

        let clash = repo
            .insert(owner(OwnerKind::User, "kees", "other@example.com"))
            .await;
        assert!(matches!(clash, Err(DbError::UniqueViolation(c)) if c == "users_username_key"));

        // Same username under the other kind is fine.
        repo.insert(owner(OwnerKind::Example, "kees", "kees@example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_keeps_own_values_and_reports_missing() {
        let repo = MemoryRepository::new();
        let mut kees = owner(OwnerKind::User, "kees", "kees@example.com");
        repo.insert(kees.clone()).await.unwrap();

        kees.username = String::from("cornelis");
        assert!(repo.update(kees.clone()).await.unwrap());
        let found = repo.find(OwnerKind::User, |o| o.username == "cornelis").await;
        assert_eq!(found.map(|o| o.id), Some(kees.id));

        let stranger = owner(OwnerKind::User, "nobody", "nobody@example.com");
        assert!(!repo.update(stranger).await.unwrap());
    }
}
