//! Core types and aggregations for the Einstein360 LMS.
//!
//! This crate provides the entities every table row decodes into and the
//! pure functions computed over them:
//!
//! - **Identifiers**: `UserId`, `TraineeId`, `AttendanceId`, `ResultId`
//! - **Users**: `User`, `Role`
//! - **Roster**: `Batch`, `Trainee`
//! - **Attendance**: `AttendanceRecord`, `attendance_stats`
//! - **Assessments**: `Question`, `AssessmentResult`, `module_scores`, `curriculum`
//!
//! Nothing here performs I/O; storage lives in `lms-store`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assessment;
pub mod attendance;
pub mod ids;
pub mod roster;
pub mod time;
pub mod user;

pub use assessment::{
    compare_module_ids, curriculum, default_question, module_scores, AssessmentResult,
    CurriculumGroup, ModuleScore, Question, PENDING_SCORE, SKIPPED_MEDIA,
};
pub use attendance::{attendance_stats, AttendanceRecord, AttendanceStats, PRESENT};
pub use ids::{AttendanceId, ResultId, TraineeId, UserId};
pub use roster::{Batch, Trainee, NOT_AVAILABLE};
pub use time::{date_part, now_timestamp};
pub use user::{emails_match, normalize_email, Role, User, PENDING_SETUP};
