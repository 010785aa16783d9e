//! Common test utilities for LMS integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use lms_service::{create_router, AppState, LocalMediaStore, ServiceConfig};
use lms_store::{MemoryBackend, TableStore};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for direct inspection.
    pub store: TableStore,
    /// Temporary directory for uploaded media (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Where uploaded media is written.
    pub upload_dir: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty in-memory store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let upload_dir = temp_dir.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload directory");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            upload_dir: upload_dir.to_string_lossy().to_string(),
            seed_defaults: false,
            ..ServiceConfig::default()
        };

        let store = TableStore::new(MemoryBackend::new());
        let media = Arc::new(LocalMediaStore::new(&upload_dir));
        let state = AppState::new(store.clone(), media, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            upload_dir,
        }
    }

    /// POST a JSON body and return the decoded response body.
    pub async fn post_json(&self, path: &str, body: Value) -> Value {
        self.server.post(path).json(&body).await.json()
    }

    /// Register a user and return its ID.
    pub async fn register(&self, name: &str, email: &str, password: &str, role: &str) -> String {
        let body = self
            .post_json(
                "/api/auth/register",
                json!({ "name": name, "email": email, "password": password, "role": role }),
            )
            .await;
        assert_eq!(body["status"], "success", "register failed: {body}");
        body["user"]["id"].as_str().expect("user id").to_string()
    }

    /// Create a batch for `trainer_id` with the named trainees.
    pub async fn create_batch(&self, code: &str, trainer_id: &str, trainees: &[&str]) {
        let trainees: Vec<Value> = trainees.iter().map(|n| json!({ "name": n })).collect();
        let body = self
            .post_json(
                "/api/batches",
                json!({
                    "batch_code": code,
                    "batch_name": format!("Batch {code}"),
                    "trainer_id": trainer_id,
                    "start_date": "2024-01-01",
                    "end_date": "2024-03-31",
                    "max_capacity": 30,
                    "trainees": trainees,
                }),
            )
            .await;
        assert_eq!(body["status"], "success", "create batch failed: {body}");
    }

    /// Trainees of a batch as returned by the API.
    pub async fn trainees(&self, batch_code: &str) -> Vec<Value> {
        self.server
            .get("/api/trainees")
            .add_query_param("batchCode", batch_code)
            .await
            .json()
    }

    /// ID of the trainee called `name` in `batch_code`.
    pub async fn trainee_id(&self, batch_code: &str, name: &str) -> String {
        self.trainees(batch_code)
            .await
            .into_iter()
            .find(|t| t["name"] == name)
            .and_then(|t| t["id"].as_str().map(str::to_string))
            .expect("trainee exists")
    }

    /// Submit an attempt without media and return the response body.
    pub async fn submit_attempt(&self, trainee_id: &str, name: &str, module: &str) -> Value {
        self.post_json(
            "/api/assessments/results",
            json!({ "traineeId": trainee_id, "traineeName": name, "moduleNum": module }),
        )
        .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
