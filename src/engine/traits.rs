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

//! Collaborator traits the engine depends on.
//!
//! The engine reads from two providers and writes through one recorder.
//! All three are object-safe async traits so callers can wire in the
//! bundled SQLite DAL, a remote service client, or in-memory fakes.

use crate::error::ProviderError;
use crate::models::{AssignmentSettings, Member, NewAssignmentHistory};
use async_trait::async_trait;

/// Read-side collaborator for per-household configuration.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Returns the stored settings for a household, or `None` when the
    /// household has none yet.
    async fn get_settings(
        &self,
        household_id: &str,
    ) -> Result<Option<AssignmentSettings>, ProviderError>;
}

/// Read-side collaborator for members and their workload counters.
#[async_trait]
pub trait MemberWorkloadProvider: Send + Sync {
    /// Lists every member of the household with current workload counters.
    /// An empty result is valid (empty household).
    async fn list_members_with_workload(
        &self,
        household_id: &str,
    ) -> Result<Vec<Member>, ProviderError>;
}

/// Write-side collaborator that persists decisions and updates counters.
///
/// Both operations are best-effort from the engine's perspective but are
/// expected to be durable on the collaborator side. `increment_workload`
/// must be atomic at the storage layer (an in-place `SET col = col + ?`,
/// never read-modify-write) so concurrent decisions never lose updates.
#[async_trait]
pub trait AssignmentRecorder: Send + Sync {
    /// Adds `amount` to the member's cumulative workload, opens one more
    /// current task, and stamps the assignment time.
    async fn increment_workload(
        &self,
        household_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<(), ProviderError>;

    /// Appends one history row for the decision.
    async fn record_history(&self, entry: NewAssignmentHistory) -> Result<(), ProviderError>;
}
