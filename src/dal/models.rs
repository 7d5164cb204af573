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

//! SQLite-specific row models.
//!
//! Diesel model definitions using SQLite-compatible types: UUIDs as BLOB
//! (`Vec<u8>`), timestamps as RFC3339 TEXT, booleans as INTEGER 0/1. These
//! are internal to the DAL and converted to/from domain types at the DAL
//! boundary.

use crate::database::schema::*;
use diesel::prelude::*;

// ============================================================================
// Assignment Settings Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assignment_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteAssignmentSettings {
    pub household_id: String,
    pub enabled: i32,
    pub fairness_algorithm: String,
    pub consider_workload: i32,
    pub consider_recent_assignments: i32,
    pub min_days_between_assignments: i32,
    pub max_consecutive_assignments: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = assignment_settings)]
pub struct NewSqliteAssignmentSettings {
    pub household_id: String,
    pub enabled: i32,
    pub fairness_algorithm: String,
    pub consider_workload: i32,
    pub consider_recent_assignments: i32,
    pub min_days_between_assignments: i32,
    pub max_consecutive_assignments: i32,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Household Member Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = household_members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteHouseholdMember {
    pub id: Vec<u8>,
    pub household_id: String,
    pub user_id: String,
    pub display_name: String,
    pub current_tasks_count: i32,
    pub completed_tasks_count: i32,
    pub total_workload_score: f64,
    pub last_assignment_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = household_members)]
pub struct NewSqliteHouseholdMember {
    pub id: Vec<u8>,
    pub household_id: String,
    pub user_id: String,
    pub display_name: String,
    pub current_tasks_count: i32,
    pub completed_tasks_count: i32,
    pub total_workload_score: f64,
    pub last_assignment_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Assignment History Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assignment_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteAssignmentHistory {
    pub id: Vec<u8>,
    pub task_id: Option<String>,
    pub household_id: String,
    pub assigned_to: String,
    pub method: String,
    pub workload_score: f64,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = assignment_history)]
pub struct NewSqliteAssignmentHistory {
    pub id: Vec<u8>,
    pub task_id: Option<String>,
    pub household_id: String,
    pub assigned_to: String,
    pub method: String,
    pub workload_score: f64,
    pub created_at: String,
}

// ============================================================================
// Conversion Utilities
// ============================================================================

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Convert a UUID to SQLite BLOB format (Vec<u8>)
pub fn uuid_to_blob(uuid: &Uuid) -> Vec<u8> {
    uuid.as_bytes().to_vec()
}

/// Convert SQLite BLOB to UUID
pub fn blob_to_uuid(blob: &[u8]) -> Result<Uuid, uuid::Error> {
    Uuid::from_slice(blob)
}

/// Convert DateTime<Utc> to RFC3339 string for SQLite storage
pub fn datetime_to_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse RFC3339 string from SQLite to DateTime<Utc>
pub fn string_to_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Current timestamp as RFC3339 string
pub fn current_timestamp_string() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================================
// Conversion Implementations: SQLite models -> Domain models
// ============================================================================

use crate::models::{AssignmentHistory, AssignmentSettings, FairnessAlgorithm, Member};

impl From<SqliteAssignmentSettings> for AssignmentSettings {
    fn from(s: SqliteAssignmentSettings) -> Self {
        AssignmentSettings {
            household_id: s.household_id,
            enabled: s.enabled != 0,
            fairness_algorithm: FairnessAlgorithm::parse_lossy(&s.fairness_algorithm),
            consider_workload: s.consider_workload != 0,
            consider_recent_assignments: s.consider_recent_assignments != 0,
            min_days_between_assignments: s.min_days_between_assignments,
            max_consecutive_assignments: s.max_consecutive_assignments,
            created_at: string_to_datetime(&s.created_at).expect("Invalid timestamp in database"),
            updated_at: string_to_datetime(&s.updated_at).expect("Invalid timestamp in database"),
        }
    }
}

impl From<SqliteHouseholdMember> for Member {
    fn from(m: SqliteHouseholdMember) -> Self {
        Member {
            user_id: m.user_id,
            display_name: m.display_name,
            current_tasks_count: m.current_tasks_count,
            completed_tasks_count: m.completed_tasks_count,
            total_workload_score: m.total_workload_score,
            last_assignment_at: m
                .last_assignment_at
                .map(|ts| string_to_datetime(&ts).expect("Invalid timestamp in database")),
        }
    }
}

impl From<SqliteAssignmentHistory> for AssignmentHistory {
    fn from(h: SqliteAssignmentHistory) -> Self {
        AssignmentHistory {
            id: blob_to_uuid(&h.id).expect("Invalid UUID in database"),
            task_id: h.task_id,
            household_id: h.household_id,
            assigned_to: h.assigned_to,
            method: FairnessAlgorithm::parse_lossy(&h.method),
            workload_score: h.workload_score,
            created_at: string_to_datetime(&h.created_at).expect("Invalid timestamp in database"),
        }
    }
}
