//! Identifier types for every entity kind.
//!
//! Uses UUID v7 for time-ordered, globally unique identifiers. Each entity
//! kind gets its own newtype so a page id can never be passed where a
//! scrapbook id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new identifier with the current timestamp.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier from a string.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

entity_id! {
    /// Stable identifier of an authenticated user, as issued by the identity provider.
    UserId
}

entity_id! {
    /// Identifier of a scrapbook.
    ScrapbookId
}

entity_id! {
    /// Identifier of a page within a scrapbook.
    PageId
}

entity_id! {
    /// Identifier of a positioned element on a page.
    ElementId
}

entity_id! {
    /// Identifier of a song in the shared catalog.
    SongId
}

entity_id! {
    /// Identifier of a scrapbook-to-song association.
    SongLinkId
}
