//! Shared application state for the API server.
//!
//! [`AppState`] carries the collaborators every request needs: the owner
//! repository (which owns the read/write routing) and the password
//! encoder. Both are chosen once at startup and injected here; handlers
//! never reach for globals.

use std::sync::Arc;

use crate::error::ApiError;
use crate::password::{BcryptPasswordEncoder, PasswordEncoder};
use crate::repository::OwnerRepository;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Data access for owners and observations.
    pub repository: OwnerRepository,
    /// Encoder used to store and verify passwords.
    pub passwords: Arc<dyn PasswordEncoder>,
}

impl AppState {
    /// Create application state from its collaborators.
    pub const fn new(repository: OwnerRepository, passwords: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            repository,
            passwords,
        }
    }

    /// In-memory state with the default password encoder.
    pub fn in_memory() -> Self {
        Self::new(
            OwnerRepository::in_memory(),
            Arc::new(BcryptPasswordEncoder::new()),
        )
    }

    /// Hash `raw` on the blocking pool; bcrypt is CPU-bound.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if hashing fails or the task panics.
    pub async fn encode_password(&self, raw: String) -> Result<String, ApiError> {
        let passwords = Arc::clone(&self.passwords);
        let encoded = tokio::task::spawn_blocking(move || passwords.encode(&raw))
            .await
            .map_err(|e| ApiError::Internal(format!("password task failed: {e}")))??;
        Ok(encoded)
    }

    /// Check `raw` against a stored hash on the blocking pool.
    pub async fn password_matches(&self, raw: String, encoded: String) -> bool {
        let passwords = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || passwords.matches(&raw, &encoded))
            .await
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("repository", &self.repository.name())
            .finish_non_exhaustive()
    }
}
