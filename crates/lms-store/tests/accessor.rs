//! Table accessor contract, exercised against the in-memory backend.

use lms_core::{AssessmentResult, Batch, Role, Trainee, TraineeId, User, UserId};
use lms_store::schema::{self, RESULTS, TRAINEES, USERS};
use lms_store::{queries, MemoryBackend, Row, StoreError, TableStore};

fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| (*c).to_string()).collect()
}

// =============================================================================
// ensure_table
// =============================================================================

#[tokio::test]
async fn ensure_table_is_idempotent() {
    let store = TableStore::new(MemoryBackend::new());

    store.ensure_table(&USERS).await.unwrap();
    let handle = store.ensure_table(&USERS).await.unwrap();

    let rows = handle.read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], USERS.header_row());
}

#[tokio::test]
async fn ensure_table_leaves_existing_rows_alone() {
    let store = TableStore::new(MemoryBackend::with_rows([(
        &USERS,
        vec![
            USERS.header_row(),
            row(&["USR-1", "Ann", "ann@example.com", "pw", "Owner", "t"]),
        ],
    )]));

    let handle = store.ensure_table(&USERS).await.unwrap();
    assert_eq!(handle.read_all().await.unwrap().len(), 2);
}

// =============================================================================
// Row positions
// =============================================================================

#[tokio::test]
async fn scan_reports_sheet_row_positions() {
    let store = TableStore::new(MemoryBackend::new());
    let users = store.table_of::<User>().await.unwrap();

    for name in ["Ann", "Bob", "Cid"] {
        let email = format!("{}@example.com", name.to_lowercase());
        users
            .insert(&User::new(name, &email, "pw", Role::Trainer))
            .await
            .unwrap();
    }

    let scanned = users.scan::<User>().await.unwrap();
    let positions: Vec<_> = scanned.iter().map(|s| s.row_position).collect();
    assert_eq!(positions, vec![2, 3, 4]);
    assert_eq!(scanned[1].record.name, "Bob");
}

#[tokio::test]
async fn update_cell_targets_the_scanned_row() {
    let store = TableStore::new(MemoryBackend::new());
    let results = store.table_of::<AssessmentResult>().await.unwrap();

    for module in ["1", "2"] {
        let attempt = AssessmentResult::submitted(
            TraineeId::from("TRN-1"),
            "Ann",
            module,
            1,
            "Skipped",
            "Skipped",
        );
        results.insert(&attempt).await.unwrap();
    }

    let second = results
        .find::<AssessmentResult, _>(|r| lms_store::row::cell_equals(r, schema::results::MODULE_NUMBER, "2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.row_position, 3);

    results
        .update_cell(second.row_position, schema::results::SCORE, "75")
        .await
        .unwrap();

    let scanned = results.scan::<AssessmentResult>().await.unwrap();
    assert_eq!(scanned[0].record.score, "");
    assert_eq!(scanned[1].record.score, "75");
}

#[tokio::test]
async fn update_cell_rejects_the_header_row() {
    let store = TableStore::new(MemoryBackend::new());
    let handle = store.ensure_table(&RESULTS).await.unwrap();

    let err = handle.update_cell(1, 0, "x").await.unwrap_err();
    assert!(matches!(err, StoreError::RowOutOfRange { row_position: 1, .. }));
    assert_eq!(handle.read_all().await.unwrap()[0], RESULTS.header_row());
}

// =============================================================================
// Short rows
// =============================================================================

#[tokio::test]
async fn short_rows_decode_with_empty_cells() {
    let store = TableStore::new(MemoryBackend::with_rows([(
        &TRAINEES,
        vec![TRAINEES.header_row(), row(&["TRN-1", "B1", "Ann"])],
    )]));

    let trainee = queries::find_trainee(&store, "TRN-1").await.unwrap().unwrap();
    assert_eq!(trainee.name, "Ann");
    assert_eq!(trainee.mobile, "");
    assert_eq!(trainee.email, "");
}

#[tokio::test]
async fn missing_cells_never_match_an_empty_filter_value() {
    let store = TableStore::new(MemoryBackend::with_rows([(
        &TRAINEES,
        vec![
            TRAINEES.header_row(),
            row(&["TRN-1"]),
            row(&["TRN-2", "", "Nobody"]),
        ],
    )]));

    let unbatched = queries::trainees_in_batch(&store, "").await.unwrap();
    let ids: Vec<_> = unbatched.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["TRN-2"]);
}

// =============================================================================
// Three-hop trainer filter
// =============================================================================

#[tokio::test]
async fn trainer_filter_follows_batches_then_trainees_then_results() {
    let store = TableStore::new(MemoryBackend::new());
    let trainer = UserId::from("USR-T1");

    let batches = store.table_of::<Batch>().await.unwrap();
    for (code, owner) in [("B1", "USR-T1"), ("B2", "USR-T1"), ("B3", "USR-T2")] {
        batches
            .insert(&Batch {
                code: code.into(),
                name: format!("Batch {code}"),
                trainer_id: owner.into(),
                start_date: "2024-01-01".into(),
                end_date: "2024-03-01".into(),
                max_capacity: "20".into(),
                timestamp: String::new(),
            })
            .await
            .unwrap();
    }

    let trainees = store.table_of::<Trainee>().await.unwrap();
    let mut enrolled = Vec::new();
    for batch in ["B1", "B2", "B3"] {
        let trainee = Trainee::enroll(batch, format!("In {batch}"), None, None);
        enrolled.push(trainee.id.clone());
        trainees.insert(&trainee).await.unwrap();
    }

    let results = store.table_of::<AssessmentResult>().await.unwrap();
    for id in &enrolled {
        let attempt =
            AssessmentResult::submitted(id.clone(), "x", "1", 1, "Skipped", "Skipped");
        results.insert(&attempt).await.unwrap();
    }

    let ids = queries::trainer_trainee_ids(&store, trainer.as_str()).await.unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(enrolled[0].as_str()));
    assert!(ids.contains(enrolled[1].as_str()));

    let pending = queries::pending_reviews(&store, trainer.as_str(), &Role::Trainer)
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|r| r.trainee_id != enrolled[2]));
}
