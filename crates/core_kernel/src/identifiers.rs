//! Typed identifiers for clients and wizard sessions
//!
//! Both wrap a UUID. On the wire and in URL paths they are the bare UUID;
//! in logs they carry a short prefix (`CLI-…`, `SES-…`) so the two never
//! get confused when reading a trace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Failure to parse an identifier from text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    /// The text carries another identifier's prefix
    #[error("expected a {expected} identifier, got prefix {found}")]
    WrongPrefix { expected: &'static str, found: String },

    #[error("malformed identifier: {0}")]
    Malformed(String),
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Time-ordered id
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Bare UUID text, as used in REST paths
            pub fn path_segment(&self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        /// Accepts the prefixed display form or a bare UUID
        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let bare = match Uuid::parse_str(s) {
                    Ok(uuid) => return Ok(Self(uuid)),
                    Err(_) => match s.split_once('-') {
                        Some((prefix, rest)) if prefix == Self::PREFIX => rest,
                        Some((prefix, _)) if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_uppercase()) => {
                            return Err(IdParseError::WrongPrefix {
                                expected: Self::PREFIX,
                                found: prefix.to_string(),
                            });
                        }
                        _ => s,
                    },
                };
                Uuid::parse_str(bare)
                    .map(Self)
                    .map_err(|_| IdParseError::Malformed(s.to_string()))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

typed_id!(
    /// A client in the system of record
    ClientId,
    "CLI"
);

typed_id!(
    /// One registration wizard held by the API
    SessionId,
    "SES"
);
