//! Strong type definitions for list sharing.
//!
//! Identifiers are opaque strings issued by the document database. They are
//! wrapped in newtypes so a list id can never be passed where a user id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an opaque identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_id!(
    /// Identifier of the user who owns a list.
    UserId
);

opaque_id!(
    /// Identifier of a shopping list.
    ListId
);

opaque_id!(
    /// Identifier of an item on a shopping list.
    ItemId
);

opaque_id!(
    /// Identifier of a product category.
    CategoryId
);

/// The logical content of a share token.
///
/// Immutable once constructed. A fresh payload is built for every share-link
/// request; nothing is ever updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    user_id: UserId,
    list_id: ListId,
    /// Issuance time (Unix milliseconds).
    created_at: i64,
}

impl SharePayload {
    /// Build a payload with an explicit issuance time.
    pub fn new(user_id: UserId, list_id: ListId, created_at: i64) -> Self {
        Self {
            user_id,
            list_id,
            created_at,
        }
    }

    /// The list owner.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The shared list.
    pub fn list_id(&self) -> &ListId {
        &self.list_id
    }

    /// Issuance time in Unix milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Milliseconds elapsed between issuance and `now`.
    ///
    /// Negative when the token claims to be from the future.
    pub fn age_millis(&self, now: i64) -> i64 {
        now.saturating_sub(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_raw() {
        let id = UserId::new("user-123");
        assert_eq!(id.to_string(), "user-123");
        assert_eq!(format!("{:?}", id), "UserId(user-123)");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = ListId::new("list-abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"list-abc\"");
    }

    #[test]
    fn test_payload_field_names() {
        let payload = SharePayload::new("u".into(), "l".into(), 42);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"userId":"u","listId":"l","createdAt":42}"#);
    }

    #[test]
    fn test_age_saturates() {
        let payload = SharePayload::new("u".into(), "l".into(), i64::MIN);
        assert_eq!(payload.age_millis(i64::MAX), i64::MAX);
        let payload = SharePayload::new("u".into(), "l".into(), 1_000);
        assert_eq!(payload.age_millis(1_500), 500);
        assert_eq!(payload.age_millis(500), -500);
    }
}
