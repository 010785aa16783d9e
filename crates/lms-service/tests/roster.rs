//! Batch, trainee and attendance integration tests.

mod common;

use axum_test::multipart::{MultipartForm, Part};
use common::TestHarness;
use serde_json::{json, Value};

#[tokio::test]
async fn batches_are_scoped_to_their_trainer() {
    let harness = TestHarness::new();
    let t1 = harness.register("T One", "t1@example.com", "pw", "Trainer").await;
    let t2 = harness.register("T Two", "t2@example.com", "pw", "Trainer").await;
    harness.create_batch("B1", &t1, &["Ann"]).await;
    harness.create_batch("B2", &t2, &[]).await;

    let own: Vec<Value> = harness
        .server
        .get("/api/batches")
        .add_query_param("userId", &t1)
        .add_query_param("role", "Trainer")
        .await
        .json();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["code"], "B1");
    assert_eq!(own[0]["trainerId"], t1.as_str());
    assert_eq!(own[0]["maxCapacity"], 30);

    let all: Vec<Value> = harness
        .server
        .get("/api/batches")
        .add_query_param("userId", "anyone")
        .add_query_param("role", "Owner")
        .await
        .json();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn callers_without_a_user_id_see_no_batches() {
    let harness = TestHarness::new();
    harness.create_batch("B1", "", &["Ann"]).await;

    let anonymous: Vec<Value> = harness.server.get("/api/batches").await.json();
    assert!(anonymous.is_empty());

    let owner: Vec<Value> = harness
        .server
        .get("/api/batches")
        .add_query_param("role", "Owner")
        .await
        .json();
    assert_eq!(owner.len(), 1);
}

#[tokio::test]
async fn batch_creation_skips_unnamed_trainees() {
    let harness = TestHarness::new();
    let body = harness
        .post_json(
            "/api/batches",
            json!({
                "batch_code": "B1",
                "batch_name": "Morning",
                "trainer_id": "USR-t",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01",
                "max_capacity": "20",
                "trainees": [{ "name": "Ann", "mobile": "555" }, { "name": "" }, {}],
            }),
        )
        .await;
    assert_eq!(body["status"], "success");

    let trainees = harness.trainees("B1").await;
    assert_eq!(trainees.len(), 1);
    assert_eq!(trainees[0]["name"], "Ann");
    assert_eq!(trainees[0]["mobile"], "555");
    assert_eq!(trainees[0]["email"], "N/A");
    assert_eq!(trainees[0]["batchCode"], "B1");
    assert!(trainees[0]["id"].as_str().unwrap().starts_with("TRN-"));
}

#[tokio::test]
async fn trainees_can_be_added_singly_and_in_bulk() {
    let harness = TestHarness::new();

    let single = harness
        .post_json(
            "/api/trainees",
            json!({ "batchCode": "B1", "name": "Ann", "mobile": "555", "email": "ann@example.com" }),
        )
        .await;
    assert_eq!(single["status"], "success");

    let bulk = harness
        .post_json(
            "/api/trainees/bulk",
            json!({ "batchCode": "B1", "trainees": [{ "name": "Bob" }, { "name": "" }, { "name": "Cid" }] }),
        )
        .await;
    assert_eq!(bulk["status"], "success");
    assert_eq!(bulk["added"], 2);

    let names: Vec<Value> = harness
        .trainees("B1")
        .await
        .into_iter()
        .map(|t| t["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Ann"), json!("Bob"), json!("Cid")]);
}

#[tokio::test]
async fn listing_without_batch_code_is_empty() {
    let harness = TestHarness::new();
    harness.create_batch("B1", "USR-t", &["Ann"]).await;

    let trainees: Vec<Value> = harness.server.get("/api/trainees").await.json();
    assert!(trainees.is_empty());
}

#[tokio::test]
async fn csv_upload_is_parsed_without_storing() {
    let harness = TestHarness::new();
    let csv = "Name,Phone,Email\nAnn,555,ann@example.com\n\"Lee, Bo\",,\n,999,x@example.com\n";
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(csv.as_bytes().to_vec())
            .file_name("roster.csv")
            .mime_type("text/csv"),
    );

    let response = harness
        .server
        .post("/api/trainees/parse-csv")
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["trainees"],
        json!([
            { "name": "Ann", "mobile": "555", "email": "ann@example.com" },
            { "name": "Lee, Bo", "mobile": "N/A", "email": "N/A" },
        ])
    );
}

#[tokio::test]
async fn csv_upload_without_file_field_is_refused() {
    let harness = TestHarness::new();
    let form = MultipartForm::new().add_text("note", "no file here");

    let body: Value = harness
        .server
        .post("/api/trainees/parse-csv")
        .multipart(form)
        .await
        .json();

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn profile_combines_attendance_scores_and_curriculum() {
    let harness = TestHarness::new();
    harness.create_batch("B1", "USR-t", &["Ann"]).await;
    let ann = harness.trainee_id("B1", "Ann").await;

    for (date, status) in [("2024-01-01", "P"), ("2024-01-02", "A"), ("2024-01-03", "P")] {
        let saved = harness
            .post_json(
                "/api/attendance",
                json!({
                    "batch_code": "B1",
                    "date": date,
                    "records": [{ "trainee_id": ann, "status": status }],
                }),
            )
            .await;
        assert_eq!(saved["status"], "success");
    }

    harness.submit_attempt(&ann, "Ann", "2").await;
    harness.submit_attempt(&ann, "Ann", "2").await;
    harness.submit_attempt(&ann, "Ann", "1").await;

    let pending: Vec<Value> = harness.server.get("/api/reviews/pending").await.json();
    for (result, score) in pending.iter().zip(["80", "90", "70"]) {
        let graded = harness
            .post_json(
                "/api/reviews/grade",
                json!({ "resultId": result["resultId"], "score": score }),
            )
            .await;
        assert_eq!(graded["status"], "success");
    }

    let response = harness.server.get(&format!("/api/trainees/{ann}")).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "success");
    assert_eq!(body["info"]["name"], "Ann");
    assert_eq!(body["info"]["batch"], "B1");
    assert_eq!(body["stats"], json!({ "total": 3, "percentage": 67 }));
    assert_eq!(body["modules"]["2"], json!({ "score": "85.0", "attempts": 2 }));
    assert_eq!(body["modules"]["1"], json!({ "score": "70.0", "attempts": 1 }));
    assert_eq!(body["curriculum"], json!([]));
}

#[tokio::test]
async fn unknown_trainee_profile_is_refused() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/trainees/TRN-missing").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Trainee not found");
}
