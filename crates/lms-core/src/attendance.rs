//! Attendance records and the attendance percentage.

use serde::{Deserialize, Serialize};

use crate::time::now_timestamp;
use crate::{AttendanceId, TraineeId};

/// Status code for a present trainee. Compared exactly, without case folding.
pub const PRESENT: &str = "P";

/// One attendance mark for one trainee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The record ID.
    pub record_id: AttendanceId,
    /// Batch the mark was taken in.
    pub batch_code: String,
    /// The trainee marked.
    pub trainee_id: TraineeId,
    /// Session date as entered.
    pub date: String,
    /// Status code, `P` or `A` in practice.
    pub status: String,
    /// When the mark was recorded.
    pub timestamp: String,
}

impl AttendanceRecord {
    /// Create a new mark with a fresh ID.
    #[must_use]
    pub fn mark(
        batch_code: impl Into<String>,
        trainee_id: TraineeId,
        date: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            record_id: AttendanceId::generate(),
            batch_code: batch_code.into(),
            trainee_id,
            date: date.into(),
            status: status.into(),
            timestamp: now_timestamp(),
        }
    }

    /// Whether this mark counts as present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.status == PRESENT
    }
}

/// Attendance summary for one trainee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStats {
    /// Number of marks recorded.
    pub total: usize,
    /// Rounded percentage of marks that are present, 0 when there are none.
    pub percentage: usize,
}

/// Summarize a trainee's attendance marks.
///
/// The percentage rounds half to even, so 1 present out of 8 is 12.
pub fn attendance_stats<'a, I>(records: I) -> AttendanceStats
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let (total, present) = records
        .into_iter()
        .fold((0usize, 0usize), |(total, present), record| {
            (total + 1, present + usize::from(record.is_present()))
        });

    AttendanceStats {
        total,
        percentage: rounded_percentage(present, total),
    }
}

/// `round(100 * part / whole)` in integer arithmetic, ties to even.
///
/// Ties are decided on the exact ratio. A float computation can land just
/// below a tie and round down instead: 23 of 40 is exactly 57.5 and gives
/// 58 here, where `(23.0 / 40.0 * 100.0).round_ties_even()` gives 57.
fn rounded_percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    let scaled = part * 100;
    let quotient = scaled / whole;
    let remainder = scaled % whole;
    match (remainder * 2).cmp(&whole) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + quotient % 2,
        std::cmp::Ordering::Less => quotient,
    }
}
