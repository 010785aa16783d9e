//! Identifier types for the LMS.
//!
//! Every entity created by the service carries a short random token with a
//! semantic prefix (`USR-`, `TRN-`, `ATT-`, `RES-`). Tokens are opaque: they
//! are never parsed, validated, or checked for collisions.
//!
//! # Macro-based ID Types
//!
//! The `prefixed_id_type!` macro keeps the identifier newtypes consistent in
//! serialization, display, and conversion behavior.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random characters appended after the prefix.
const TOKEN_LEN: usize = 8;

/// Macro to define a prefixed identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `String` with:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as a plain string)
/// - `Display`, `Debug`
/// - `From<String>`, `From<&str>`, `Into<String>`
macro_rules! prefixed_id_type {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix shared by every generated identifier of this type.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(random_token(Self::PREFIX))
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier and return the inner string.
            #[must_use]
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

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

prefixed_id_type!(UserId, "USR-", "A user identifier (owners and trainers).");
prefixed_id_type!(TraineeId, "TRN-", "A trainee identifier.");
prefixed_id_type!(AttendanceId, "ATT-", "An attendance record identifier.");
prefixed_id_type!(ResultId, "RES-", "An assessment result identifier.");

/// Build `prefix` followed by the first eight characters of a v4 UUID.
fn random_token(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &uuid[..TOKEN_LEN])
}
