//! User accounts: owners and trainers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::now_timestamp;
use crate::UserId;

/// Password placeholder stored for invited users who have not set one yet.
///
/// A user holding this value can never log in, even if the submitted
/// password equals it.
pub const PENDING_SETUP: &str = "PENDING_SETUP";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address as stored (registration lowercases it).
    pub email: String,
    /// Stored password, or [`PENDING_SETUP`].
    pub password: String,
    /// Role of the user.
    pub role: Role,
    /// When the user was created.
    pub timestamp: String,
}

impl User {
    /// Create a new user with a fresh ID and the current timestamp.
    ///
    /// The email is normalized before storage.
    #[must_use]
    pub fn new(name: impl Into<String>, email: &str, password: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            email: normalize_email(email),
            password: password.into(),
            role,
            timestamp: now_timestamp(),
        }
    }

    /// Create a trainer account that still has to complete password setup.
    #[must_use]
    pub fn invited_trainer(name: impl Into<String>, email: &str) -> Self {
        Self::new(name, email, PENDING_SETUP, Role::Trainer)
    }

    /// Whether the account is still waiting for its password to be set.
    #[must_use]
    pub fn is_pending_setup(&self) -> bool {
        self.password == PENDING_SETUP
    }

    /// Whether this user's email matches `email`, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        emails_match(&self.email, email)
    }
}

/// User role.
///
/// Stored in the `Role` column as its display string. Values other than
/// the two known roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Sees every batch and every pending review.
    Owner,
    /// Sees only the batches assigned to them.
    Trainer,
    /// Any other stored value, including the empty string.
    Other(String),
}

impl Role {
    /// The stored string form of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owner => "Owner",
            Self::Trainer => "Trainer",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "Owner" => Self::Owner,
            "Trainer" => Self::Trainer,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize an email for storage and comparison.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Compare two emails, ignoring case and surrounding whitespace.
#[must_use]
pub fn emails_match(a: &str, b: &str) -> bool {
    normalize_email(a) == normalize_email(b)
}
