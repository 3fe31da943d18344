//! Enumeration types for the Birdwatch backend.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which family of accounts an owner belongs to.
///
/// Users and examples behave identically; they only live in different
/// tables and are served under different URL prefixes. Every store and
/// service operation is parametrized by this kind instead of being
/// duplicated per account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OwnerKind {
    /// A regular registered user (`/users`).
    User,
    /// An example account (`/example`).
    Example,
}

impl OwnerKind {
    /// All owner kinds, in routing order.
    pub const ALL: [Self; 2] = [Self::User, Self::Example];

    /// Table holding owners of this kind.
    pub const fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Example => "examples",
        }
    }

    /// Column on `observations` that references owners of this kind.
    pub const fn observation_fk(self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Example => "example_id",
        }
    }

    /// URL path segment under which this kind is served.
    pub const fn route_prefix(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Example => "example",
        }
    }
}

impl core::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Example => f.write_str("example"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_tables_and_columns() {
        assert_eq!(OwnerKind::User.table(), "users");
        assert_eq!(OwnerKind::Example.table(), "examples");
        assert_eq!(OwnerKind::User.observation_fk(), "user_id");
        assert_eq!(OwnerKind::Example.observation_fk(), "example_id");
    }

    #[test]
    fn example_prefix_is_singular() {
        assert_eq!(OwnerKind::User.route_prefix(), "users");
        assert_eq!(OwnerKind::Example.route_prefix(), "example");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&OwnerKind::Example).ok();
        assert_eq!(json.as_deref(), Some("\"example\""));
    }
}
