//! Trainer listing and invitation handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use lms_core::User;
use lms_store::queries;

use crate::error::{ApiError, ApiJson};
use crate::handlers::StatusResponse;
use crate::state::AppState;

/// Trainer summary for assignment pickers.
#[derive(Debug, Serialize)]
pub struct TrainerResponse {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// List every user with the `Trainer` role.
pub async fn list_trainers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrainerResponse>>, ApiError> {
    let trainers = queries::list_trainers(&state.store).await?;

    Ok(Json(
        trainers
            .into_iter()
            .map(|t| TrainerResponse {
                id: t.id.into_inner(),
                name: t.name,
            })
            .collect(),
    ))
}

/// Invitation request.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    /// Trainer name.
    #[serde(default)]
    pub name: String,
    /// Trainer email; stored lowercased.
    #[serde(default)]
    pub email: String,
}

/// Create a trainer account that must complete password setup before it
/// can log in.
pub async fn invite_trainer(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<InviteRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if queries::email_registered(&state.store, &req.email).await? {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let trainer = User::invited_trainer(req.name, &req.email);
    state.store.table_of::<User>().await?.insert(&trainer).await?;

    // Delivery is out of band; the log line is the invitation record.
    tracing::info!(user_id = %trainer.id, email = %trainer.email, "Invitation sent");
    Ok(Json(StatusResponse::success()))
}
