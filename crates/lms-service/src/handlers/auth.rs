//! Login, registration and password setup handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use lms_core::{Role, User};
use lms_store::queries;

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

const PENDING_MESSAGE: &str = "Account pending. Please check your email to set a password.";

/// User as returned to the client. The password is never included.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// Role name.
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
        }
    }
}

/// Response carrying the authenticated or created user.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The user.
    pub user: UserResponse,
}

impl AuthResponse {
    fn success(user: &User) -> Json<Self> {
        Json(Self {
            status: "success",
            user: user.into(),
        })
    }
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email, matched ignoring case and surrounding whitespace.
    #[serde(default)]
    pub email: String,
    /// Password, compared exactly.
    #[serde(default)]
    pub password: String,
}

/// Authenticate by email and password.
///
/// Every account holding the email is checked in table order. The first
/// one still pending setup refuses the login, the first one whose password
/// matches accepts it.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    for user in queries::users_with_email(&state.store, &req.email).await? {
        if user.is_pending_setup() {
            tracing::warn!(user_id = %user.id, "Login refused, account pending setup");
            return Err(ApiError::Unauthorized(PENDING_MESSAGE.into()));
        }
        if user.password == req.password {
            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
            return Ok(AuthResponse::success(&user));
        }
    }

    tracing::warn!("Login refused, invalid credentials");
    Err(ApiError::Unauthorized("Invalid Credentials".into()))
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email; stored lowercased.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Role name, e.g. `Owner` or `Trainer`.
    #[serde(default)]
    pub role: String,
}

/// Create a user unless the email is already registered.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if queries::email_registered(&state.store, &req.email).await? {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = User::new(req.name, &req.email, req.password, Role::from(req.role));
    state.store.table_of::<User>().await?.insert(&user).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(AuthResponse::success(&user))
}

/// Password setup request.
#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    /// Email of the account to update.
    #[serde(default)]
    pub email: String,
    /// New password.
    #[serde(default)]
    pub password: String,
}

/// Set the password of an existing account, typically an invited trainer.
pub async fn complete_setup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SetupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = queries::set_password(&state.store, &req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    tracing::info!(user_id = %user.id, "Account setup completed");
    Ok(AuthResponse::success(&user))
}
