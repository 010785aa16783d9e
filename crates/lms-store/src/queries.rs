//! Lookups and filters over the LMS tables.
//!
//! Every query ensures its tables and re-reads them in full; nothing is
//! cached between calls. Filters compare raw cells through
//! [`cell_equals`], so rows too short to hold the compared column never
//! match.

use std::collections::HashSet;

use lms_core::{
    emails_match, AssessmentResult, AttendanceRecord, Batch, Question, Role, Trainee, User,
};

use crate::accessor::{Stored, TableStore};
use crate::error::Result;
use crate::row::{cell, cell_equals};
use crate::schema::{attendance, batches, questions, results, trainees, users};

// ============================================================================
// Users
// ============================================================================

/// The first user whose email matches, ignoring case and surrounding
/// whitespace.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn find_user_by_email(store: &TableStore, email: &str) -> Result<Option<Stored<User>>> {
    let table = store.table_of::<User>().await?;
    table
        .find::<User, _>(|row| emails_match(cell(row, users::EMAIL), email))
        .await
}

/// Every user whose email matches, in table order.
///
/// Uniqueness is only enforced at registration, so legacy data can hold
/// more than one account per email.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn users_with_email(store: &TableStore, email: &str) -> Result<Vec<User>> {
    let table = store.table_of::<User>().await?;
    let matches = table
        .filter::<User, _>(|row| emails_match(cell(row, users::EMAIL), email))
        .await?;
    Ok(matches.into_iter().map(|s| s.record).collect())
}

/// Whether any user already holds `email`.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn email_registered(store: &TableStore, email: &str) -> Result<bool> {
    Ok(find_user_by_email(store, email).await?.is_some())
}

/// Every user with the `Trainer` role.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn list_trainers(store: &TableStore) -> Result<Vec<User>> {
    let table = store.table_of::<User>().await?;
    let trainers = table
        .filter::<User, _>(|row| cell_equals(row, users::ROLE, Role::Trainer.as_str()))
        .await?;
    Ok(trainers.into_iter().map(|s| s.record).collect())
}

/// Overwrite the password of the first user matching `email`.
///
/// Returns the user as it reads after the update, or `None` when no user
/// matches.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn set_password(
    store: &TableStore,
    email: &str,
    password: &str,
) -> Result<Option<User>> {
    let table = store.table_of::<User>().await?;
    let Some(Stored {
        row_position,
        mut record,
    }) = table
        .find::<User, _>(|row| emails_match(cell(row, users::EMAIL), email))
        .await?
    else {
        return Ok(None);
    };

    table
        .update_cell(row_position, users::PASSWORD, password)
        .await?;
    tracing::info!(user_id = %record.id, row = row_position, "Password updated");

    record.password = password.to_string();
    Ok(Some(record))
}

// ============================================================================
// Batches and trainees
// ============================================================================

/// Batches visible to a user: all of them for an owner, otherwise the
/// batches whose trainer is `user_id`. An empty `user_id` owns nothing, so
/// batches with a blank trainer cell stay hidden from anonymous callers.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn batches_for(store: &TableStore, user_id: &str, role: &Role) -> Result<Vec<Batch>> {
    let table = store.table_of::<Batch>().await?;
    let visible = if *role == Role::Owner {
        table.scan::<Batch>().await?
    } else if user_id.is_empty() {
        Vec::new()
    } else {
        table
            .filter::<Batch, _>(|row| cell_equals(row, batches::TRAINER_ID, user_id))
            .await?
    };
    Ok(visible.into_iter().map(|s| s.record).collect())
}

/// Trainees enrolled in `batch_code`.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn trainees_in_batch(store: &TableStore, batch_code: &str) -> Result<Vec<Trainee>> {
    let table = store.table_of::<Trainee>().await?;
    let enrolled = table
        .filter::<Trainee, _>(|row| cell_equals(row, trainees::BATCH_CODE, batch_code))
        .await?;
    Ok(enrolled.into_iter().map(|s| s.record).collect())
}

/// The trainee with `trainee_id`, if any.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn find_trainee(store: &TableStore, trainee_id: &str) -> Result<Option<Trainee>> {
    let table = store.table_of::<Trainee>().await?;
    let found = table
        .find::<Trainee, _>(|row| cell_equals(row, trainees::ID, trainee_id))
        .await?;
    Ok(found.map(|s| s.record))
}

/// IDs of the trainees in batches assigned to `trainer_id`.
///
/// Two hops: the trainer's batch codes, then the trainees enrolled in any
/// of those batches.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn trainer_trainee_ids(store: &TableStore, trainer_id: &str) -> Result<HashSet<String>> {
    if trainer_id.is_empty() {
        return Ok(HashSet::new());
    }

    let batch_table = store.table_of::<Batch>().await?;
    let batch_codes: HashSet<String> = batch_table
        .filter::<Batch, _>(|row| cell_equals(row, batches::TRAINER_ID, trainer_id))
        .await?
        .into_iter()
        .map(|s| s.record.code)
        .collect();

    let trainee_table = store.table_of::<Trainee>().await?;
    let trainee_ids = trainee_table
        .filter::<Trainee, _>(|row| {
            row.get(trainees::BATCH_CODE)
                .is_some_and(|code| batch_codes.contains(code))
        })
        .await?
        .into_iter()
        .map(|s| s.record.id.into_inner())
        .collect();

    Ok(trainee_ids)
}

// ============================================================================
// Attendance
// ============================================================================

/// Every attendance mark of one trainee.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn attendance_for(store: &TableStore, trainee_id: &str) -> Result<Vec<AttendanceRecord>> {
    let table = store.table_of::<AttendanceRecord>().await?;
    let marks = table
        .filter::<AttendanceRecord, _>(|row| cell_equals(row, attendance::TRAINEE_ID, trainee_id))
        .await?;
    Ok(marks.into_iter().map(|s| s.record).collect())
}

// ============================================================================
// Questions
// ============================================================================

/// Every question, in table order.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn all_questions(store: &TableStore) -> Result<Vec<Question>> {
    let table = store.table_of::<Question>().await?;
    let rows = table.scan::<Question>().await?;
    Ok(rows.into_iter().map(|s| s.record).collect())
}

/// Questions whose module ID equals `module_id` exactly.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn questions_for_module(store: &TableStore, module_id: &str) -> Result<Vec<Question>> {
    let table = store.table_of::<Question>().await?;
    let matching = table
        .filter::<Question, _>(|row| cell_equals(row, questions::MODULE_ID, module_id))
        .await?;
    Ok(matching.into_iter().map(|s| s.record).collect())
}

// ============================================================================
// Results
// ============================================================================

/// Every result of one trainee, in submission order.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn results_for(store: &TableStore, trainee_id: &str) -> Result<Vec<AssessmentResult>> {
    let table = store.table_of::<AssessmentResult>().await?;
    let attempts = table
        .filter::<AssessmentResult, _>(|row| cell_equals(row, results::TRAINEE_ID, trainee_id))
        .await?;
    Ok(attempts.into_iter().map(|s| s.record).collect())
}

/// Number of recorded attempts for a trainee and module.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn count_attempts(store: &TableStore, trainee_id: &str, module: &str) -> Result<usize> {
    let rows = store.table_of::<AssessmentResult>().await?.read_all().await?;
    Ok(rows
        .iter()
        .skip(1)
        .filter(|row| {
            cell_equals(row, results::TRAINEE_ID, trainee_id)
                && cell_equals(row, results::MODULE_NUMBER, module)
        })
        .count())
}

/// Attempt number for the next submission: prior attempts plus one.
///
/// Nothing is reserved. Two submissions racing between this read and their
/// inserts observe the same count and store the same attempt number.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn next_attempt_number(store: &TableStore, trainee_id: &str, module: &str) -> Result<usize> {
    Ok(count_attempts(store, trainee_id, module).await? + 1)
}

/// Ungraded results visible to a user.
///
/// A result is ungraded when its score cell is present and empty; rows
/// that end before the score column are not listed.
///
/// Owners (and any role other than `Trainer`) see every ungraded result.
/// Trainers see only results of trainees in their own batches, found
/// through batches, then trainees, then results.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn pending_reviews(
    store: &TableStore,
    user_id: &str,
    role: &Role,
) -> Result<Vec<AssessmentResult>> {
    let table = store.table_of::<AssessmentResult>().await?;
    let pending: Vec<AssessmentResult> = table
        .filter::<AssessmentResult, _>(|row| cell_equals(row, results::SCORE, ""))
        .await?
        .into_iter()
        .map(|s| s.record)
        .collect();

    if *role != Role::Trainer {
        return Ok(pending);
    }

    let trainee_ids = trainer_trainee_ids(store, user_id).await?;
    Ok(pending
        .into_iter()
        .filter(|result| trainee_ids.contains(result.trainee_id.as_str()))
        .collect())
}

/// Set the score of the first result with `result_id`.
///
/// Returns `false` when no result matches. The score is stored verbatim.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn grade_result(store: &TableStore, result_id: &str, score: &str) -> Result<bool> {
    let table = store.table_of::<AssessmentResult>().await?;
    let Some(found) = table
        .find::<AssessmentResult, _>(|row| cell_equals(row, results::RESULT_ID, result_id))
        .await?
    else {
        return Ok(false);
    };

    table
        .update_cell(found.row_position, results::SCORE, score)
        .await?;
    tracing::info!(
        result_id = %result_id,
        row = found.row_position,
        score = %score,
        "Result graded"
    );
    Ok(true)
}
