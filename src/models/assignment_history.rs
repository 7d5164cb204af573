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

//! Assignment history records.
//!
//! Every successful decision with a `task_id` is appended to the history
//! log for auditing and fairness analysis. History rows are never updated.

use crate::models::assignment_settings::FairnessAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted assignment decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentHistory {
    pub id: Uuid,
    /// The task the decision was made for, when the caller supplied one.
    pub task_id: Option<String>,
    pub household_id: String,
    /// `user_id` of the selected member.
    pub assigned_to: String,
    /// The strategy that made the selection.
    pub method: FairnessAlgorithm,
    /// The selected member's final fairness score at decision time.
    pub workload_score: f64,
    pub created_at: DateTime<Utc>,
}

/// A history record to be inserted. The id and timestamp are attached by
/// the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignmentHistory {
    pub task_id: Option<String>,
    pub household_id: String,
    pub assigned_to: String,
    pub method: FairnessAlgorithm,
    pub workload_score: f64,
}
