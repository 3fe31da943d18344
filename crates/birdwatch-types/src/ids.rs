//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Owners and observations each get a strongly-typed ID so a user id can
//! never be passed where an observation id is expected. All IDs use UUID v7
//! (time-ordered) for efficient database indexing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an owner (a user or an example account).
    OwnerId
}

define_id! {
    /// Unique identifier for a single recorded observation.
    ObservationId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_not_nil() {
        let owner = OwnerId::new();
        let observation = ObservationId::new();
        assert_ne!(owner.into_inner(), Uuid::nil());
        assert_ne!(observation.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = OwnerId::new();
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.into_inner())));
    }

    #[test]
    fn id_binding_is_a_plain_string() {
        use ts_rs::TS;

        assert_eq!(OwnerId::inline(), "string");
        assert_eq!(ObservationId::inline(), "string");
    }

    #[test]
    fn id_deserializes_from_bare_uuid() {
        let uuid = Uuid::now_v7();
        let parsed: Option<ObservationId> = serde_json::from_str(&format!("\"{uuid}\"")).ok();
        assert_eq!(parsed, Some(ObservationId(uuid)));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = ObservationId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
