//! Encoding between typed records and stored rows.
//!
//! Each table has exactly one decode function. Decoding never fails:
//! cells missing from a short row become empty strings, and extra trailing
//! cells are ignored.

use lms_core::{AssessmentResult, AttendanceRecord, Batch, Question, Role, Trainee, User};

use crate::row::{cell, Row};
use crate::schema::{self, Table};

/// A typed record stored in one table.
pub trait Record: Sized {
    /// The table holding records of this type.
    const TABLE: &'static Table;

    /// Build a record from a stored row.
    fn decode(row: &[String]) -> Self;

    /// Convert the record into a row in header order.
    fn encode(&self) -> Row;
}

fn text(row: &[String], column: usize) -> String {
    cell(row, column).to_string()
}

impl Record for User {
    const TABLE: &'static Table = &schema::USERS;

    fn decode(row: &[String]) -> Self {
        use schema::users as c;
        Self {
            id: cell(row, c::ID).into(),
            name: text(row, c::NAME),
            email: text(row, c::EMAIL),
            password: text(row, c::PASSWORD),
            role: Role::from(cell(row, c::ROLE)),
            timestamp: text(row, c::TIMESTAMP),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.password.clone(),
            self.role.to_string(),
            self.timestamp.clone(),
        ]
    }
}

impl Record for Batch {
    const TABLE: &'static Table = &schema::BATCHES;

    fn decode(row: &[String]) -> Self {
        use schema::batches as c;
        Self {
            code: text(row, c::CODE),
            name: text(row, c::NAME),
            trainer_id: cell(row, c::TRAINER_ID).into(),
            start_date: text(row, c::START_DATE),
            end_date: text(row, c::END_DATE),
            max_capacity: text(row, c::MAX_CAPACITY),
            timestamp: text(row, c::TIMESTAMP),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.trainer_id.to_string(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.max_capacity.clone(),
            self.timestamp.clone(),
        ]
    }
}

impl Record for Trainee {
    const TABLE: &'static Table = &schema::TRAINEES;

    fn decode(row: &[String]) -> Self {
        use schema::trainees as c;
        Self {
            id: cell(row, c::ID).into(),
            batch_code: text(row, c::BATCH_CODE),
            name: text(row, c::NAME),
            mobile: text(row, c::MOBILE),
            email: text(row, c::EMAIL),
            timestamp: text(row, c::TIMESTAMP),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.id.to_string(),
            self.batch_code.clone(),
            self.name.clone(),
            self.mobile.clone(),
            self.email.clone(),
            self.timestamp.clone(),
        ]
    }
}

impl Record for AttendanceRecord {
    const TABLE: &'static Table = &schema::ATTENDANCE;

    fn decode(row: &[String]) -> Self {
        use schema::attendance as c;
        Self {
            record_id: cell(row, c::RECORD_ID).into(),
            batch_code: text(row, c::BATCH_CODE),
            trainee_id: cell(row, c::TRAINEE_ID).into(),
            date: text(row, c::DATE),
            status: text(row, c::STATUS),
            timestamp: text(row, c::TIMESTAMP),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.record_id.to_string(),
            self.batch_code.clone(),
            self.trainee_id.to_string(),
            self.date.clone(),
            self.status.clone(),
            self.timestamp.clone(),
        ]
    }
}

impl Record for Question {
    const TABLE: &'static Table = &schema::QUESTIONS;

    fn decode(row: &[String]) -> Self {
        use schema::questions as c;
        Self {
            module_id: text(row, c::MODULE_ID),
            module_name: text(row, c::MODULE_NAME),
            question_text: text(row, c::QUESTION_TEXT),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.module_id.clone(),
            self.module_name.clone(),
            self.question_text.clone(),
        ]
    }
}

impl Record for AssessmentResult {
    const TABLE: &'static Table = &schema::RESULTS;

    fn decode(row: &[String]) -> Self {
        use schema::results as c;
        Self {
            result_id: cell(row, c::RESULT_ID).into(),
            trainee_id: cell(row, c::TRAINEE_ID).into(),
            trainee_name: text(row, c::TRAINEE_NAME),
            module_number: text(row, c::MODULE_NUMBER),
            video_link: text(row, c::VIDEO_LINK),
            audio_link: text(row, c::AUDIO_LINK),
            attempt_count: text(row, c::ATTEMPT_COUNT),
            score: text(row, c::SCORE),
            timestamp: text(row, c::TIMESTAMP),
        }
    }

    fn encode(&self) -> Row {
        vec![
            self.result_id.to_string(),
            self.trainee_id.to_string(),
            self.trainee_name.clone(),
            self.module_number.clone(),
            self.video_link.clone(),
            self.audio_link.clone(),
            self.attempt_count.clone(),
            self.score.clone(),
            self.timestamp.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::{TraineeId, SKIPPED_MEDIA};

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn encoded_rows_match_header_width() {
        let user = User::new("Ann", "ann@x.io", "pw", Role::Owner);
        assert_eq!(user.encode().len(), User::TABLE.width());

        let trainee = Trainee::enroll("B1", "Ravi", None, None);
        assert_eq!(trainee.encode().len(), Trainee::TABLE.width());

        let result = AssessmentResult::submitted(
            TraineeId::from("TRN-1"),
            "Ravi",
            "2",
            1,
            SKIPPED_MEDIA,
            SKIPPED_MEDIA,
        );
        assert_eq!(result.encode().len(), AssessmentResult::TABLE.width());
    }

    #[test]
    fn decode_inverts_encode() {
        let user = User::new("Ann", "ann@x.io", "pw", Role::Trainer);
        assert_eq!(User::decode(&user.encode()), user);

        let question = Question::new("1", "Basics", "What is a variable?");
        assert_eq!(Question::decode(&question.encode()), question);
    }

    #[test]
    fn short_rows_decode_with_empty_trailing_fields() {
        // A Results row written before the Score and Timestamp columns existed.
        let legacy = row(&["RES-1", "TRN-1", "Ravi", "3", "/v", "/a", "1"]);
        let result = AssessmentResult::decode(&legacy);
        assert_eq!(result.module_number, "3");
        assert_eq!(result.score, "");
        assert_eq!(result.timestamp, "");
        assert!(result.is_pending_review());

        let user = User::decode(&row(&["USR-1", "Ann"]));
        assert_eq!(user.email, "");
        assert_eq!(user.role, Role::Other(String::new()));
    }

    #[test]
    fn extra_cells_are_ignored() {
        let q = Question::decode(&row(&["1", "Basics", "Q?", "stray"]));
        assert_eq!(q.question_text, "Q?");
    }
}
