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

//! Diesel table definitions for the SQLite schema.
//!
//! SQLite storage conventions: UUIDs as BLOB, timestamps as RFC3339 TEXT,
//! booleans as INTEGER 0/1, scores as REAL.

diesel::table! {
    assignment_settings (household_id) {
        household_id -> Text,
        enabled -> Integer,
        fairness_algorithm -> Text,
        consider_workload -> Integer,
        consider_recent_assignments -> Integer,
        min_days_between_assignments -> Integer,
        max_consecutive_assignments -> Integer,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    household_members (id) {
        id -> Binary,
        household_id -> Text,
        user_id -> Text,
        display_name -> Text,
        current_tasks_count -> Integer,
        completed_tasks_count -> Integer,
        total_workload_score -> Double,
        last_assignment_at -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    assignment_history (id) {
        id -> Binary,
        task_id -> Nullable<Text>,
        household_id -> Text,
        assigned_to -> Text,
        method -> Text,
        workload_score -> Double,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    assignment_settings,
    household_members,
    assignment_history,
);
