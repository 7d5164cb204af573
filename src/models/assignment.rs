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

//! Assignment request and decision types.
//!
//! An [`AssignmentRequest`] is ephemeral, one per `assign_task` call. The
//! resulting [`AssignmentDecision`] carries the full ranked score list so
//! callers and tests can inspect how the selection was made.

use crate::models::assignment_settings::FairnessAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default relative cost of a task when the caller supplies none.
pub const DEFAULT_EFFORT_SCORE: f64 = 1.0;

/// One request to assign a task to a household member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub household_id: String,
    /// When present, the decision is also appended to the history log.
    pub task_id: Option<String>,
    pub task_title: String,
    pub task_category: Option<String>,
    /// Relative cost of the task, used to weight the workload increment.
    /// Non-finite or non-positive values are clamped to
    /// [`DEFAULT_EFFORT_SCORE`] rather than rejected.
    pub effort_score: f64,
    /// Members ineligible for this task.
    pub exclude_user_ids: HashSet<String>,
    /// Members to bias toward.
    pub prefer_user_ids: HashSet<String>,
}

impl AssignmentRequest {
    pub fn new(household_id: impl Into<String>, task_title: impl Into<String>) -> Self {
        AssignmentRequest {
            household_id: household_id.into(),
            task_id: None,
            task_title: task_title.into(),
            task_category: None,
            effort_score: DEFAULT_EFFORT_SCORE,
            exclude_user_ids: HashSet::new(),
            prefer_user_ids: HashSet::new(),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_effort_score(mut self, effort_score: f64) -> Self {
        self.effort_score = effort_score;
        self
    }

    pub fn excluding(mut self, user_id: impl Into<String>) -> Self {
        self.exclude_user_ids.insert(user_id.into());
        self
    }

    pub fn preferring(mut self, user_id: impl Into<String>) -> Self {
        self.prefer_user_ids.insert(user_id.into());
        self
    }

    /// Effort score with the clamp-not-fail policy applied.
    pub fn normalized_effort(&self) -> f64 {
        if self.effort_score.is_finite() && self.effort_score > 0.0 {
            self.effort_score
        } else {
            DEFAULT_EFFORT_SCORE
        }
    }
}

/// Per-factor contributions to a member's fairness score. Zero means the
/// factor did not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// `-10 x (total_workload_score - household mean)`; positive for
    /// members below the household average.
    pub workload_adjustment: f64,
    /// `-15 x current_tasks_count`.
    pub current_task_penalty: f64,
    /// `-50` inside the cooldown window, otherwise `+min(days x 5, 30)`.
    pub recency_adjustment: f64,
    /// `+25` when the request prefers this member.
    pub preference_bonus: f64,
    /// `+20 x completion rate`.
    pub completion_bonus: f64,
    /// Tie-breaking noise in `[0, 10)`.
    pub jitter: f64,
}

/// A member with their computed fairness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub user_id: String,
    pub display_name: String,
    /// Final score, clamped to a minimum of 0.
    pub score: f64,
    pub last_assignment_at: Option<DateTime<Utc>>,
    pub breakdown: ScoreBreakdown,
}

/// The outcome of a successful `assign_task` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDecision {
    pub household_id: String,
    /// `user_id` of the selected member.
    pub assigned_to: String,
    pub display_name: String,
    /// The strategy that made the selection.
    pub method: FairnessAlgorithm,
    /// The selected member's final score.
    pub score: f64,
    /// Human-readable explanation of the non-trivial contributing factors.
    /// Advisory only, never parsed programmatically.
    pub assignment_reason: String,
    /// The full score list, sorted descending, for transparency.
    pub ranking: Vec<ScoredMember>,
    /// False when the best-effort Recorder write failed; the decision is
    /// still valid and the failure was logged.
    pub recorded: bool,
    pub decided_at: DateTime<Utc>,
}
