//! Batch handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lms_core::{now_timestamp, Batch, Role, Trainee};
use lms_store::queries;

use crate::error::{ApiError, ApiJson, ApiQuery};
use crate::handlers::trainees::TraineeInput;
use crate::handlers::{cell_json, scalar_text, StatusResponse};
use crate::state::AppState;

/// Caller identity passed as query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerQuery {
    /// Calling user.
    #[serde(default)]
    pub user_id: String,
    /// Calling user's role.
    #[serde(default)]
    pub role: String,
}

/// Batch as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// Batch code.
    pub code: String,
    /// Batch name.
    pub name: String,
    /// Assigned trainer.
    pub trainer_id: String,
    /// Start date.
    pub start_date: String,
    /// End date.
    pub end_date: String,
    /// Capacity, numeric when the stored value is.
    pub max_capacity: Value,
}

impl From<&Batch> for BatchResponse {
    fn from(batch: &Batch) -> Self {
        Self {
            code: batch.code.clone(),
            name: batch.name.clone(),
            trainer_id: batch.trainer_id.to_string(),
            start_date: batch.start_date.clone(),
            end_date: batch.end_date.clone(),
            max_capacity: cell_json(&batch.max_capacity),
        }
    }
}

/// List batches: every batch for an owner, otherwise the caller's own.
pub async fn list_batches(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ViewerQuery>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let role = Role::from(query.role);
    let batches = queries::batches_for(&state.store, &query.user_id, &role).await?;
    Ok(Json(batches.iter().map(BatchResponse::from).collect()))
}

/// Batch creation request.
#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    /// Batch code.
    pub batch_code: String,
    /// Batch name.
    pub batch_name: String,
    /// Assigned trainer.
    pub trainer_id: String,
    /// Start date.
    pub start_date: String,
    /// End date.
    pub end_date: String,
    /// Capacity, number or string.
    pub max_capacity: Value,
    /// Trainees to enroll right away.
    #[serde(default)]
    pub trainees: Vec<TraineeInput>,
}

/// Create a batch, then enroll its named trainees.
///
/// Rows are appended one at a time; a failure part way leaves the rows
/// already written in place.
pub async fn create_batch(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateBatchRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let batch = Batch {
        code: req.batch_code,
        name: req.batch_name,
        trainer_id: req.trainer_id.into(),
        start_date: req.start_date,
        end_date: req.end_date,
        max_capacity: scalar_text(&req.max_capacity),
        timestamp: now_timestamp(),
    };
    state.store.table_of::<Batch>().await?.insert(&batch).await?;

    let trainees = state.store.table_of::<Trainee>().await?;
    let mut enrolled = 0usize;
    for input in req.trainees {
        if let Some(trainee) = input.into_trainee(&batch.code) {
            trainees.insert(&trainee).await?;
            enrolled += 1;
        }
    }

    tracing::info!(
        batch_code = %batch.code,
        trainer_id = %batch.trainer_id,
        trainees = enrolled,
        "Batch created"
    );
    Ok(Json(StatusResponse::success()))
}
