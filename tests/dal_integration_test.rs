/*
 *  Copyright 2025 Fairshare Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! DAL integration tests against a real SQLite database.

use chrono::Utc;
use fairshare::dal::DAL;
use fairshare::database::Database;
use fairshare::engine::{AssignmentEngine, EngineConfig, FixedClock, FixedRandom};
use fairshare::error::StorageError;
use fairshare::models::{
    AssignmentRequest, FairnessAlgorithm, NewAssignmentHistory, NewAssignmentSettings,
};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

async fn setup() -> (TempDir, DAL) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("fairshare_test.db");
    let database = Database::new(db_path.to_str().unwrap());
    database
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    (dir, DAL::new(database))
}

#[tokio::test]
#[serial]
async fn settings_are_created_lazily_on_first_read() {
    let (_dir, dal) = setup().await;

    assert!(dal.settings().get("house-1").await.unwrap().is_none());

    let created = dal.settings().get_or_create("house-1").await.unwrap();
    assert!(created.enabled);
    assert_eq!(created.fairness_algorithm, FairnessAlgorithm::Balanced);
    assert_eq!(created.min_days_between_assignments, 1);
    assert_eq!(created.max_consecutive_assignments, 3);

    // Second read returns the same row, not a fresh one.
    let again = dal.settings().get_or_create("house-1").await.unwrap();
    assert_eq!(again.created_at, created.created_at);
    assert!(dal.settings().get("house-1").await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn settings_upsert_round_trip() {
    let (_dir, dal) = setup().await;

    let mut incoming = NewAssignmentSettings::defaults("house-1");
    incoming.fairness_algorithm = FairnessAlgorithm::Weighted;
    incoming.min_days_between_assignments = 3;
    let first = dal.settings().upsert(incoming.clone()).await.unwrap();
    assert_eq!(first.fairness_algorithm, FairnessAlgorithm::Weighted);
    assert_eq!(first.min_days_between_assignments, 3);

    incoming.enabled = false;
    incoming.fairness_algorithm = FairnessAlgorithm::RoundRobin;
    let second = dal.settings().upsert(incoming).await.unwrap();
    assert!(!second.enabled);
    assert_eq!(second.fairness_algorithm, FairnessAlgorithm::RoundRobin);
    // The original creation time survives the overwrite.
    assert_eq!(second.created_at, first.created_at);
}

#[tokio::test]
#[serial]
async fn settings_upsert_rejects_invalid_bounds() {
    let (_dir, dal) = setup().await;

    let mut bad = NewAssignmentSettings::defaults("house-1");
    bad.max_consecutive_assignments = 0;
    let result = dal.settings().upsert(bad).await;
    assert!(matches!(result, Err(StorageError::Invalid(_))));
}

#[tokio::test]
#[serial]
async fn member_counters_move_atomically() {
    let (_dir, dal) = setup().await;

    let alice = dal
        .members()
        .add_member("house-1", "alice", "Alice")
        .await
        .unwrap();
    assert_eq!(alice.current_tasks_count, 0);
    assert_eq!(alice.total_workload_score, 0.0);
    assert!(alice.last_assignment_at.is_none());

    let assigned_at = Utc::now();
    dal.members()
        .increment_workload("house-1", "alice", 2.5, assigned_at)
        .await
        .unwrap();
    dal.members()
        .increment_workload("house-1", "alice", 1.0, assigned_at)
        .await
        .unwrap();

    let alice = dal
        .members()
        .get("house-1", "alice")
        .await
        .unwrap()
        .expect("alice should exist");
    assert_eq!(alice.total_workload_score, 3.5);
    assert_eq!(alice.current_tasks_count, 2);
    assert!(alice.last_assignment_at.is_some());

    let missing = dal
        .members()
        .increment_workload("house-1", "nobody", 1.0, assigned_at)
        .await;
    assert!(matches!(missing, Err(StorageError::NotFound)));
}

#[tokio::test]
#[serial]
async fn complete_task_floors_open_count_at_zero() {
    let (_dir, dal) = setup().await;

    dal.members()
        .add_member("house-1", "bob", "Bob")
        .await
        .unwrap();
    dal.members()
        .increment_workload("house-1", "bob", 1.0, Utc::now())
        .await
        .unwrap();

    dal.members().complete_task("house-1", "bob").await.unwrap();
    dal.members().complete_task("house-1", "bob").await.unwrap();

    let bob = dal
        .members()
        .get("house-1", "bob")
        .await
        .unwrap()
        .expect("bob should exist");
    assert_eq!(bob.current_tasks_count, 0);
    assert_eq!(bob.completed_tasks_count, 2);
}

#[tokio::test]
#[serial]
async fn members_are_scoped_to_their_household() {
    let (_dir, dal) = setup().await;

    dal.members()
        .add_member("house-1", "alice", "Alice")
        .await
        .unwrap();
    dal.members()
        .add_member("house-2", "carol", "Carol")
        .await
        .unwrap();

    let members = dal.members().list_by_household("house-1").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, "alice");

    assert!(dal
        .members()
        .list_by_household("house-3")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[serial]
async fn history_records_and_lists_newest_first() {
    let (_dir, dal) = setup().await;

    for (task, user) in [("t1", "alice"), ("t2", "bob"), ("t3", "alice")] {
        let recorded = dal
            .history()
            .record(NewAssignmentHistory {
                task_id: Some(task.to_string()),
                household_id: "house-1".to_string(),
                assigned_to: user.to_string(),
                method: FairnessAlgorithm::Balanced,
                workload_score: 120.0,
            })
            .await
            .unwrap();
        assert_eq!(recorded.assigned_to, user);
        // Distinct created_at values so ordering is observable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let recent = dal.history().list_recent("house-1", 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].task_id.as_deref(), Some("t3"));
    assert_eq!(recent[1].task_id.as_deref(), Some("t2"));
}

#[tokio::test]
#[serial]
async fn assign_task_end_to_end_over_sqlite() {
    let (_dir, dal) = setup().await;
    let dal = Arc::new(dal);

    // Recency off so the outcome depends only on stored workload.
    let mut settings = NewAssignmentSettings::defaults("house-1");
    settings.consider_recent_assignments = false;
    dal.settings().upsert(settings).await.unwrap();

    dal.members()
        .add_member("house-1", "alice", "Alice")
        .await
        .unwrap();
    dal.members()
        .add_member("house-1", "bob", "Bob")
        .await
        .unwrap();
    dal.members()
        .increment_workload("house-1", "alice", 8.0, Utc::now())
        .await
        .unwrap();

    let engine = AssignmentEngine::with_sources(
        dal.clone(),
        dal.clone(),
        dal.clone(),
        EngineConfig::default(),
        Arc::new(FixedClock(Utc::now())),
        Arc::new(FixedRandom(0.0)),
    );

    let decision = engine
        .assign_task(
            AssignmentRequest::new("house-1", "Take out the trash")
                .with_task_id("task-42")
                .with_effort_score(2.0),
        )
        .await
        .unwrap();

    assert_eq!(decision.assigned_to, "bob");
    assert_eq!(decision.display_name, "Bob");
    assert!(decision.recorded);

    // The decision was applied to the counters and the log.
    let bob = dal
        .members()
        .get("house-1", "bob")
        .await
        .unwrap()
        .expect("bob should exist");
    assert_eq!(bob.total_workload_score, 2.0);
    assert_eq!(bob.current_tasks_count, 1);
    assert!(bob.last_assignment_at.is_some());

    let history = dal.history().list_recent("house-1", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].task_id.as_deref(), Some("task-42"));
    assert_eq!(history[0].assigned_to, "bob");
    assert_eq!(history[0].method, FairnessAlgorithm::Balanced);
}

#[tokio::test]
#[serial]
async fn duplicate_member_insert_is_rejected() {
    let (_dir, dal) = setup().await;

    dal.members()
        .add_member("house-1", "alice", "Alice")
        .await
        .unwrap();
    let duplicate = dal.members().add_member("house-1", "alice", "Alice 2").await;
    assert!(matches!(duplicate, Err(StorageError::Database(_))));
}
