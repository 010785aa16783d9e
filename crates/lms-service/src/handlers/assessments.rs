//! Assessment question and submission handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lms_core::{default_question, AssessmentResult, SKIPPED_MEDIA};
use lms_store::queries;

use crate::error::{ApiError, ApiJson};
use crate::handlers::scalar_text;
use crate::media::{decode_payload, media_filename, MediaKind};
use crate::state::AppState;

/// One question prompt.
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    /// Question text.
    pub question: String,
}

/// Questions for a module.
#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    /// Prompts in table order.
    pub questions: Vec<QuestionResponse>,
}

/// Questions for one module, or a single default prompt when none exist.
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
    Path(module_index): Path<String>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let mut questions: Vec<QuestionResponse> =
        queries::questions_for_module(&state.store, &module_index)
            .await?
            .into_iter()
            .map(|q| QuestionResponse {
                question: q.question_text,
            })
            .collect();

    if questions.is_empty() {
        questions.push(QuestionResponse {
            question: default_question(&module_index),
        });
    }

    Ok(Json(QuestionsResponse { questions }))
}

/// Recorded media, base64 encoded.
#[derive(Debug, Deserialize)]
pub struct MediaPayload {
    /// Encoded bytes; empty or absent means nothing was recorded.
    #[serde(default)]
    pub data: Option<String>,
}

/// Assessment submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    /// Trainee ID.
    pub trainee_id: String,
    /// Trainee name, used in media file names.
    pub trainee_name: String,
    /// Module number, string or number.
    pub module_num: Value,
    /// Camera recording.
    #[serde(default)]
    pub video_data: Option<MediaPayload>,
    /// Microphone recording.
    #[serde(default)]
    pub audio_data: Option<MediaPayload>,
}

/// Submission result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Attempt number assigned to this submission.
    pub attempt_count: usize,
}

/// Record an attempt.
///
/// The attempt number is the count of earlier attempts for the trainee and
/// module plus one. Nothing reserves the number between the count and the
/// insert, so concurrent submissions can share it.
pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SubmitResultRequest>,
) -> Result<Json<SubmitResultResponse>, ApiError> {
    let module = scalar_text(&req.module_num);
    let attempt = queries::next_attempt_number(&state.store, &req.trainee_id, &module).await?;

    let video_link = store_media(&state, &req, &module, MediaKind::Video, attempt).await?;
    let audio_link = store_media(&state, &req, &module, MediaKind::Audio, attempt).await?;

    let result = AssessmentResult::submitted(
        req.trainee_id.as_str().into(),
        req.trainee_name.as_str(),
        module.as_str(),
        attempt,
        video_link,
        audio_link,
    );
    state
        .store
        .table_of::<AssessmentResult>()
        .await?
        .insert(&result)
        .await?;

    tracing::info!(
        result_id = %result.result_id,
        trainee_id = %result.trainee_id,
        module = %module,
        attempt,
        "Assessment submitted"
    );
    Ok(Json(SubmitResultResponse {
        status: "success",
        attempt_count: attempt,
    }))
}

async fn store_media(
    state: &AppState,
    req: &SubmitResultRequest,
    module: &str,
    kind: MediaKind,
    attempt: usize,
) -> Result<String, ApiError> {
    let payload = match kind {
        MediaKind::Video => req.video_data.as_ref(),
        MediaKind::Audio => req.audio_data.as_ref(),
    };
    let Some(data) = payload
        .and_then(|p| p.data.as_deref())
        .filter(|d| !d.is_empty())
    else {
        return Ok(SKIPPED_MEDIA.to_string());
    };

    let bytes = decode_payload(data)?;
    let filename = media_filename(&req.trainee_name, module, kind, attempt);
    Ok(state.media.put(&filename, bytes).await?)
}
