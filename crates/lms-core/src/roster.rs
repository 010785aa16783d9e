//! Batches and the trainees enrolled in them.

use serde::{Deserialize, Serialize};

use crate::time::now_timestamp;
use crate::{TraineeId, UserId};

/// Placeholder stored when a trainee's mobile or email is not supplied.
pub const NOT_AVAILABLE: &str = "N/A";

/// A cohort of trainees assigned to one trainer over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch code chosen by the creator (unique by convention only).
    pub code: String,
    /// Display name.
    pub name: String,
    /// The trainer who owns the batch.
    pub trainer_id: UserId,
    /// Start date as entered.
    pub start_date: String,
    /// End date as entered.
    pub end_date: String,
    /// Maximum capacity as entered (usually an integer).
    pub max_capacity: String,
    /// When the batch was created.
    pub timestamp: String,
}

impl Batch {
    /// Whether the batch belongs to `trainer_id`.
    #[must_use]
    pub fn is_owned_by(&self, trainer_id: &str) -> bool {
        self.trainer_id == *trainer_id
    }
}

/// A trainee enrolled in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainee {
    /// The trainee ID.
    pub id: TraineeId,
    /// Code of the batch the trainee belongs to.
    pub batch_code: String,
    /// Display name.
    pub name: String,
    /// Mobile number, or [`NOT_AVAILABLE`].
    pub mobile: String,
    /// Email address, or [`NOT_AVAILABLE`].
    pub email: String,
    /// When the trainee was enrolled.
    pub timestamp: String,
}

impl Trainee {
    /// Enroll a new trainee in `batch_code`.
    ///
    /// Absent contact details are stored as [`NOT_AVAILABLE`].
    #[must_use]
    pub fn enroll(
        batch_code: impl Into<String>,
        name: impl Into<String>,
        mobile: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            id: TraineeId::generate(),
            batch_code: batch_code.into(),
            name: name.into(),
            mobile: mobile.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            timestamp: now_timestamp(),
        }
    }
}
