/// Document identifiers are opaque strings assigned by the store.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Serde helpers for identifiers that may arrive as JSON strings or numbers.
///
/// Document servers commonly auto-assign numeric ids to new records while
/// user-supplied ids are strings; both are normalized to [`EntityId`].
pub mod flexible_id {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt;

    use super::EntityId;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = EntityId;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or integer identifier")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntityId, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }

    /// Same as [`deserialize`] for optional identifiers (`null` or absent).
    pub mod option {
        use serde::{Deserialize, Deserializer};

        use super::super::EntityId;

        #[derive(Deserialize)]
        struct Wrapped(#[serde(deserialize_with = "super::deserialize")] EntityId);

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<EntityId>, D::Error> {
            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
        }
    }
}
