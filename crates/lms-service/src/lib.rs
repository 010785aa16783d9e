//! Einstein360 LMS HTTP API service.
//!
//! This crate provides the JSON API behind the LMS front end:
//!
//! - Login, registration and trainer invitations
//! - Batch and trainee rosters, including CSV import
//! - Attendance capture and trainee profiles
//! - Assessment submissions with recorded media, and grading
//!
//! All records live in a [`lms_store::TableStore`]; the backend is picked at
//! startup from `STORE_BACKEND`.
//!
//! # Errors
//!
//! Every error body is `{"status": "error", "message": ...}`. See
//! [`ApiError`] for which errors use HTTP 200 and which use 500.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod config;
pub mod csv;
pub mod error;
pub mod handlers;
pub mod media;
pub mod routes;
pub mod state;

pub use config::{BackendKind, ConfigError, ServiceConfig};
pub use error::ApiError;
pub use media::{LocalMediaStore, MediaError, MediaStore};
pub use routes::create_router;
pub use state::{AppState, StartupError};
