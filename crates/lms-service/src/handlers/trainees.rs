//! Trainee roster and profile handlers.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use lms_core::{
    attendance_stats, curriculum, module_scores, AttendanceStats, CurriculumGroup, ModuleScore,
    Trainee,
};
use lms_store::queries;

use crate::csv::{parse_roster, RosterEntry};
use crate::error::{ApiError, ApiJson, ApiQuery};
use crate::handlers::StatusResponse;
use crate::state::AppState;

/// Trainee as listed for a batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraineeResponse {
    /// Trainee ID.
    pub id: String,
    /// Batch code.
    pub batch_code: String,
    /// Name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email.
    pub email: String,
}

impl From<&Trainee> for TraineeResponse {
    fn from(trainee: &Trainee) -> Self {
        Self {
            id: trainee.id.to_string(),
            batch_code: trainee.batch_code.clone(),
            name: trainee.name.clone(),
            mobile: trainee.mobile.clone(),
            email: trainee.email.clone(),
        }
    }
}

/// A trainee to enroll, as sent inside batch and bulk requests.
#[derive(Debug, Deserialize)]
pub struct TraineeInput {
    /// Name; entries without one are skipped.
    #[serde(default)]
    pub name: Option<String>,
    /// Mobile number.
    #[serde(default)]
    pub mobile: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
}

impl TraineeInput {
    /// The trainee to store, or `None` when the entry has no name.
    pub(crate) fn into_trainee(self, batch_code: &str) -> Option<Trainee> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(Trainee::enroll(batch_code, name, self.mobile, self.email))
    }
}

/// Batch filter for listing trainees.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQuery {
    /// Batch code.
    pub batch_code: Option<String>,
}

/// List the trainees of one batch. Without a batch code the list is empty.
pub async fn list_trainees(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<BatchQuery>,
) -> Result<Json<Vec<TraineeResponse>>, ApiError> {
    let Some(batch_code) = query.batch_code else {
        return Ok(Json(Vec::new()));
    };

    let trainees = queries::trainees_in_batch(&state.store, &batch_code).await?;
    Ok(Json(trainees.iter().map(TraineeResponse::from).collect()))
}

/// Single trainee request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTraineeRequest {
    /// Batch to enroll in.
    pub batch_code: String,
    /// Name.
    pub name: String,
    /// Mobile number.
    #[serde(default)]
    pub mobile: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Enroll one trainee.
pub async fn add_trainee(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AddTraineeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let trainee = Trainee::enroll(req.batch_code, req.name, req.mobile, req.email);
    state
        .store
        .table_of::<Trainee>()
        .await?
        .insert(&trainee)
        .await?;

    tracing::info!(trainee_id = %trainee.id, batch_code = %trainee.batch_code, "Trainee added");
    Ok(Json(StatusResponse::success()))
}

/// Bulk enrollment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddRequest {
    /// Batch to enroll in.
    pub batch_code: String,
    /// Trainees to enroll.
    #[serde(default)]
    pub trainees: Vec<TraineeInput>,
}

/// Bulk enrollment result.
#[derive(Debug, Serialize)]
pub struct BulkAddResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Number of trainees stored.
    pub added: usize,
}

/// Enroll every named trainee in the request.
pub async fn bulk_add_trainees(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BulkAddRequest>,
) -> Result<Json<BulkAddResponse>, ApiError> {
    let table = state.store.table_of::<Trainee>().await?;
    let mut added = 0usize;
    for input in req.trainees {
        if let Some(trainee) = input.into_trainee(&req.batch_code) {
            table.insert(&trainee).await?;
            added += 1;
        }
    }

    tracing::info!(batch_code = %req.batch_code, added, "Trainees bulk added");
    Ok(Json(BulkAddResponse {
        status: "success",
        added,
    }))
}

/// Parsed roster.
#[derive(Debug, Serialize)]
pub struct ParseCsvResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Entries in file order.
    pub trainees: Vec<RosterEntry>,
}

/// Parse an uploaded CSV roster (multipart field `file`) without storing it.
pub async fn parse_csv(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseCsvResponse>, ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let text = field.text().await?;
        let trainees = parse_roster(&text);
        tracing::info!(entries = trainees.len(), "Parsed roster upload");
        return Ok(Json(ParseCsvResponse {
            status: "success",
            trainees,
        }));
    }

    Err(ApiError::BadRequest("No file uploaded".into()))
}

/// Identity section of a trainee profile.
#[derive(Debug, Serialize)]
pub struct TraineeInfo {
    /// Trainee ID.
    pub id: String,
    /// Batch code.
    pub batch: String,
    /// Name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email.
    pub email: String,
}

/// Module scores keyed by module number, in first-attempt order.
#[derive(Debug)]
pub struct ModuleMap(pub Vec<ModuleScore>);

#[derive(Serialize)]
struct ModuleEntry<'a> {
    score: &'a str,
    attempts: usize,
}

impl Serialize for ModuleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for module in &self.0 {
            map.serialize_entry(
                &module.module,
                &ModuleEntry {
                    score: &module.score,
                    attempts: module.attempts,
                },
            )?;
        }
        map.end()
    }
}

/// Full trainee profile.
#[derive(Debug, Serialize)]
pub struct TraineeDetailsResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Identity.
    pub info: TraineeInfo,
    /// Attendance summary.
    pub stats: AttendanceStats,
    /// Per-module scores.
    pub modules: ModuleMap,
    /// Module catalogue grouped by name.
    pub curriculum: Vec<CurriculumGroup>,
}

/// Trainee profile: identity, attendance, module scores and curriculum.
pub async fn trainee_details(
    State(state): State<Arc<AppState>>,
    Path(trainee_id): Path<String>,
) -> Result<Json<TraineeDetailsResponse>, ApiError> {
    let trainee = queries::find_trainee(&state.store, &trainee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trainee not found".into()))?;

    let marks = queries::attendance_for(&state.store, &trainee_id).await?;
    let results = queries::results_for(&state.store, &trainee_id).await?;
    let questions = queries::all_questions(&state.store).await?;

    Ok(Json(TraineeDetailsResponse {
        status: "success",
        info: TraineeInfo {
            id: trainee.id.into_inner(),
            batch: trainee.batch_code,
            name: trainee.name,
            mobile: trainee.mobile,
            email: trainee.email,
        },
        stats: attendance_stats(&marks),
        modules: ModuleMap(module_scores(&results)),
        curriculum: curriculum(&questions),
    }))
}
