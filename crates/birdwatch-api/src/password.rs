//! Password encoding.
//!
//! Passwords are never stored in plain text. The service layer only talks
//! to the [`PasswordEncoder`] trait; the encoder instance is chosen once at
//! startup and injected through the application state.
//!
//! The default [`BcryptPasswordEncoder`] stores standard `$2b$` bcrypt
//! strings, so the cost and salt travel with every stored hash.

/// Lowest cost bcrypt accepts.
const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts.
const MAX_COST: u32 = 31;

/// Error raised when a password cannot be encoded.
#[derive(Debug, thiserror::Error)]
#[error("password encoding failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Encodes passwords for storage and checks candidates against them.
pub trait PasswordEncoder: Send + Sync {
    /// Encode a raw password for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError`] if the hash cannot be computed.
    fn encode(&self, raw: &str) -> Result<String, PasswordError>;

    /// Whether `raw` matches a previously encoded password.
    ///
    /// Malformed stored values never match.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Adaptive bcrypt password encoder.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    /// Create an encoder with bcrypt's default cost.
    pub const fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create an encoder with a custom cost, clamped to bcrypt's range.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    /// Work factor used for new hashes.
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(raw, self.cost)?)
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        bcrypt::verify(raw, encoded).unwrap_or(false)
    }
}
