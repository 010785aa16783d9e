//! Review queue and grading handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lms_core::{date_part, AssessmentResult, Role};
use lms_store::queries;

use crate::error::{ApiError, ApiJson, ApiQuery};
use crate::handlers::batches::ViewerQuery;
use crate::handlers::{cell_json, scalar_text, StatusResponse};
use crate::state::AppState;

/// An ungraded attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReviewResponse {
    /// Result ID, used to grade.
    pub result_id: String,
    /// Trainee name.
    pub trainee_name: String,
    /// Module number.
    pub module_num: String,
    /// Video link or `Skipped`.
    pub video_link: String,
    /// Audio link or `Skipped`.
    pub audio_link: String,
    /// Attempt number, numeric when the stored value is.
    pub attempt: Value,
    /// Submission date.
    pub date: String,
}

impl From<&AssessmentResult> for PendingReviewResponse {
    fn from(result: &AssessmentResult) -> Self {
        Self {
            result_id: result.result_id.to_string(),
            trainee_name: result.trainee_name.clone(),
            module_num: result.module_number.clone(),
            video_link: result.video_link.clone(),
            audio_link: result.audio_link.clone(),
            attempt: cell_json(&result.attempt_count),
            date: date_part(&result.timestamp).to_string(),
        }
    }
}

/// Ungraded attempts visible to the caller. Trainers only see attempts of
/// trainees in their own batches.
pub async fn pending_reviews(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ViewerQuery>,
) -> Result<Json<Vec<PendingReviewResponse>>, ApiError> {
    let role = Role::from(query.role);
    let pending = queries::pending_reviews(&state.store, &query.user_id, &role).await?;
    Ok(Json(pending.iter().map(PendingReviewResponse::from).collect()))
}

/// Grade request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    /// Result to grade.
    pub result_id: String,
    /// Score, number or string; stored as text.
    pub score: Value,
}

/// Set the score of one result. A null score is rejected, since storing it
/// would empty the cell and put the result back in the review queue.
pub async fn submit_grade(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GradeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if req.score.is_null() {
        return Err(ApiError::BadRequest("score must not be null".into()));
    }
    let score = scalar_text(&req.score);
    if queries::grade_result(&state.store, &req.result_id, &score).await? {
        Ok(Json(StatusResponse::success()))
    } else {
        Err(ApiError::NotFound("Result not found".into()))
    }
}
