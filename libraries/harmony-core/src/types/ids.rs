/// ID types for Harmony entities
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "sqlx-support")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Declares an integer row identifier newtype.
///
/// All Harmony tables use `INTEGER PRIMARY KEY AUTOINCREMENT`, so every ID
/// wraps an `i64` and is stored as one.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[doc = concat!("Wrap a raw ", $entity, " row id")]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <i64 as Type<Sqlite>>::type_info()
            }

            fn compatible(ty: &SqliteTypeInfo) -> bool {
                <i64 as Type<Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <i64 as Encode<Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let id = <i64 as Decode<Sqlite>>::decode(value)?;
                Ok($name(id))
            }
        }
    };
}

define_id!(
    /// User identifier
    UserId,
    "user"
);

define_id!(
    /// Song identifier
    SongId,
    "song"
);

define_id!(
    /// Playlist identifier
    PlaylistId,
    "playlist"
);

define_id!(
    /// Playlist membership row identifier.
    ///
    /// A song may appear in a playlist more than once; the entry id names one
    /// specific occurrence.
    EntryId,
    "playlist entry"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_raw_value() {
        let id = SongId::new(12);
        assert_eq!(id.get(), 12);
        assert_eq!(SongId::from(12), id);
    }

    #[test]
    fn playlist_id_display() {
        let id = PlaylistId::new(456);
        assert_eq!(format!("{}", id), "456");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&EntryId::new(9)).unwrap();
        assert_eq!(json, "9");

        let id: UserId = serde_json::from_str("31").unwrap();
        assert_eq!(id, UserId::new(31));
    }
}
