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

//! Household member model with workload counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A household participant eligible for task assignment.
///
/// Counters are maintained by the storage layer: `current_tasks_count` and
/// `completed_tasks_count` only move through atomic increments/decrements
/// requested via the Assignment Recorder or the external completion path.
/// The engine treats members as read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Opaque user identifier, unique within the household.
    pub user_id: String,
    /// Name shown in assignment reasons and UIs.
    pub display_name: String,
    /// Tasks currently assigned and not yet completed.
    pub current_tasks_count: i32,
    /// Lifetime completed tasks.
    pub completed_tasks_count: i32,
    /// Cumulative effort-weighted load.
    pub total_workload_score: f64,
    /// When this member last received an assignment, if ever.
    pub last_assignment_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Creates a member with zeroed counters, as the storage layer does for
    /// a freshly added household participant.
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Member {
            user_id: user_id.into(),
            display_name: display_name.into(),
            current_tasks_count: 0,
            completed_tasks_count: 0,
            total_workload_score: 0.0,
            last_assignment_at: None,
        }
    }

    /// Fraction of started tasks this member has completed, in `[0, 1]`.
    /// Returns `None` when the member has no task history at all.
    pub fn completion_rate(&self) -> Option<f64> {
        let total = self.current_tasks_count + self.completed_tasks_count;
        if total > 0 {
            Some(f64::from(self.completed_tasks_count) / f64::from(total))
        } else {
            None
        }
    }
}
