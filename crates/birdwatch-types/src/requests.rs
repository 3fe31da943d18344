//! Request payloads accepted by the owner API.
//!
//! Validation rules are declared with [`validator`] and checked by the
//! service layer before any store is touched.

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

/// Payload for registering a new owner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOwnerRequest {
    /// Requested login name.
    #[validate(custom(function = "not_blank", message = "username is required"))]
    pub username: String,
    /// Contact address.
    #[validate(
        custom(function = "not_blank", message = "email is required"),
        email(message = "invalid email address")
    )]
    pub email: String,
    /// Plain-text password; encoded before it is stored.
    #[validate(custom(function = "not_blank", message = "password is required"))]
    pub password: String,
}

/// Payload for updating an existing owner.
///
/// Every field is optional. Blank fields are treated as absent, but at
/// least one field must carry a value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOwnerRequest {
    /// New login name.
    pub username: Option<String>,
    /// New contact address.
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
    /// New plain-text password.
    pub password: Option<String>,
}

impl UpdateOwnerRequest {
    /// New username, if one was provided and is not blank.
    pub fn username(&self) -> Option<&str> {
        present(self.username.as_deref())
    }

    /// New email, if one was provided and is not blank.
    pub fn email(&self) -> Option<&str> {
        present(self.email.as_deref())
    }

    /// New password, if one was provided and is not blank.
    pub fn password(&self) -> Option<&str> {
        present(self.password.as_deref())
    }

    /// Whether the request changes nothing at all.
    pub fn is_empty(&self) -> bool {
        self.username().is_none() && self.email().is_none() && self.password().is_none()
    }
}

/// Payload for recording a new observation for the authenticated owner.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewObservation {
    /// Species identifier.
    #[validate(custom(function = "not_blank", message = "speciesCode is required"))]
    pub species_code: String,
    /// Family identifier.
    #[validate(custom(function = "not_blank", message = "familyCode is required"))]
    pub family_code: String,
    /// Where the sighting happened.
    #[validate(custom(function = "not_blank", message = "location is required"))]
    pub location: String,
    /// When the sighting happened.
    pub date_time: NaiveDateTime,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("invalid email address".into()))
}
