//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    assessments, attendance, auth, batches, health, reviews, trainees, trainers,
};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
///
/// Every request reads whole tables, so a slow backend fills up quickly.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Auth
/// - `POST /api/auth/login` - Log in
/// - `POST /api/auth/register` - Create a user
/// - `POST /api/auth/setup` - Set the password of an invited user
///
/// ## Trainers
/// - `GET /api/trainers` - List trainers
/// - `POST /api/trainers/invite` - Invite a trainer
///
/// ## Roster
/// - `GET /api/batches` - List batches visible to the caller
/// - `POST /api/batches` - Create a batch with trainees
/// - `GET /api/trainees` - List trainees of a batch
/// - `POST /api/trainees` - Add one trainee
/// - `POST /api/trainees/bulk` - Add many trainees
/// - `POST /api/trainees/parse-csv` - Parse an uploaded roster
/// - `GET /api/trainees/:trainee_id` - Trainee profile
///
/// ## Attendance and assessments
/// - `POST /api/attendance` - Record attendance
/// - `GET /api/assessments/questions/:module_index` - Module questions
/// - `POST /api/assessments/results` - Submit an attempt
/// - `GET /api/reviews/pending` - Ungraded attempts
/// - `POST /api/reviews/grade` - Grade an attempt
///
/// ## Other
/// - `GET /api/health` - Store connectivity probe
/// - `GET /uploads/*` - Recorded media
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let upload_dir = state.config.upload_dir.clone();

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/setup", post(auth::complete_setup))
        // Trainers
        .route("/trainers", get(trainers::list_trainers))
        .route("/trainers/invite", post(trainers::invite_trainer))
        // Batches
        .route(
            "/batches",
            get(batches::list_batches).post(batches::create_batch),
        )
        // Trainees
        .route(
            "/trainees",
            get(trainees::list_trainees).post(trainees::add_trainee),
        )
        .route("/trainees/bulk", post(trainees::bulk_add_trainees))
        .route("/trainees/parse-csv", post(trainees::parse_csv))
        .route("/trainees/:trainee_id", get(trainees::trainee_details))
        // Attendance
        .route("/attendance", post(attendance::save_attendance))
        // Assessments
        .route(
            "/assessments/questions/:module_index",
            get(assessments::get_questions),
        )
        .route("/assessments/results", post(assessments::submit_result))
        // Reviews
        .route("/reviews/pending", get(reviews::pending_reviews))
        .route("/reviews/grade", post(reviews::submit_grade))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (no concurrency limit)
        .route("/api/health", get(health::health))
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
