//! HTTP Basic authentication.
//!
//! [`CurrentOwner`] is an Axum extractor that resolves the caller from the
//! `Authorization` header. The owner kind comes from the route's
//! [`Extension`](axum::Extension), so `/users/...` authenticates against
//! users and `/example/...` against examples.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use birdwatch_types::{Owner, OwnerKind};

use crate::error::ApiError;
use crate::state::AppState;

const BASIC_SCHEME: &str = "basic ";

/// The authenticated owner of the current request.
#[derive(Debug, Clone)]
pub struct CurrentOwner(pub Owner);

impl FromRequestParts<Arc<AppState>> for CurrentOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let kind = parts
            .extensions
            .get::<OwnerKind>()
            .copied()
            .ok_or_else(|| ApiError::Internal(String::from("route has no owner kind")))?;

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(String::from("authentication required")))?;

        let (username, password) = parse_basic(header)
            .ok_or_else(|| ApiError::Unauthorized(String::from("malformed credentials")))?;

        let rejected = || {
            tracing::debug!(%kind, username = %username, "Rejected credentials");
            ApiError::Unauthorized(String::from("bad credentials"))
        };

        let owner = state
            .repository
            .find_by_username(kind, &username)
            .await?
            .ok_or_else(rejected)?;

        if !state
            .password_matches(password, owner.password_hash.clone())
            .await
        {
            return Err(rejected());
        }

        Ok(Self(owner))
    }
}

/// Decode a `Basic` authorization header value into username and password.
///
/// The scheme name is matched case-insensitively. The password may itself
/// contain colons; only the first one separates the two parts.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let scheme = value.get(..BASIC_SCHEME.len())?;
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return None;
    }
    let encoded = value.get(BASIC_SCHEME.len()..)?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(credentials: &str) -> String {
        format!("Basic {}", STANDARD.encode(credentials))
    }

    #[test]
    fn decodes_username_and_password() {
        let parsed = parse_basic(&header_for("merel:secret"));
        assert_eq!(
            parsed,
            Some((String::from("merel"), String::from("secret")))
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("bAsIc {}", STANDARD.encode("merel:secret"));
        assert!(parse_basic(&value).is_some());
    }

    #[test]
    fn password_may_contain_colons() {
        let parsed = parse_basic(&header_for("merel:a:b:c"));
        assert_eq!(parsed, Some((String::from("merel"), String::from("a:b:c"))));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(parse_basic("Bearer abc").is_none());
        assert!(parse_basic("Basic !!!not-base64!!!").is_none());
        assert!(parse_basic(&header_for("no-colon")).is_none());
        assert!(parse_basic("Bas").is_none());
        assert!(parse_basic("").is_none());
    }
}
