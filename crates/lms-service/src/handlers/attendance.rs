//! Attendance capture handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use lms_core::AttendanceRecord;

use crate::error::{ApiError, ApiJson};
use crate::handlers::StatusResponse;
use crate::state::AppState;

/// One trainee's mark.
#[derive(Debug, Deserialize)]
pub struct MarkInput {
    /// Trainee ID.
    pub trainee_id: String,
    /// `P` for present; anything else counts as absent.
    pub status: String,
}

/// Attendance for one batch on one date.
#[derive(Debug, Deserialize)]
pub struct SaveAttendanceRequest {
    /// Batch code.
    pub batch_code: String,
    /// Session date.
    pub date: String,
    /// Marks to store.
    pub records: Vec<MarkInput>,
}

/// Append one attendance row per mark.
pub async fn save_attendance(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveAttendanceRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let table = state.store.table_of::<AttendanceRecord>().await?;
    let count = req.records.len();

    for mark in req.records {
        let record = AttendanceRecord::mark(
            req.batch_code.as_str(),
            mark.trainee_id.into(),
            req.date.as_str(),
            mark.status,
        );
        table.insert(&record).await?;
    }

    tracing::info!(batch_code = %req.batch_code, date = %req.date, count, "Attendance saved");
    Ok(Json(StatusResponse::success()))
}
