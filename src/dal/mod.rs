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

//! Data Access Layer over SQLite.
//!
//! The [`DAL`] struct provides access to all database operations through
//! per-entity sub-DALs, and implements the engine's three collaborator
//! traits directly, so a single `Arc<DAL>` can serve as the Settings
//! Provider, Member Workload Provider, and Assignment Recorder.

pub mod models;

mod history;
mod member;
mod settings;

pub use history::HistoryDal;
pub use member::MemberDal;
pub use settings::SettingsDal;

use crate::database::Database;
use crate::engine::traits::{AssignmentRecorder, MemberWorkloadProvider, SettingsProvider};
use crate::error::ProviderError;
use crate::models::{AssignmentHistory, AssignmentSettings, Member, NewAssignmentHistory};
use async_trait::async_trait;
use chrono::Utc;

/// The Data Access Layer root.
///
/// `Clone` is cheap: each clone references the same underlying connection
/// pool and can be shared between threads.
#[derive(Clone, Debug)]
pub struct DAL {
    /// The database instance with connection pool
    pub database: Database,
}

impl DAL {
    /// Creates a new DAL instance.
    pub fn new(database: Database) -> Self {
        DAL { database }
    }

    /// Returns a settings DAL for configuration operations.
    pub fn settings(&self) -> SettingsDal<'_> {
        SettingsDal { dal: self }
    }

    /// Returns a member DAL for workload operations.
    pub fn members(&self) -> MemberDal<'_> {
        MemberDal { dal: self }
    }

    /// Returns a history DAL for decision-log operations.
    pub fn history(&self) -> HistoryDal<'_> {
        HistoryDal { dal: self }
    }
}

#[async_trait]
impl SettingsProvider for DAL {
    async fn get_settings(
        &self,
        household_id: &str,
    ) -> Result<Option<AssignmentSettings>, ProviderError> {
        // First read materializes the default row (lazy-create lifecycle),
        // so this provider never reports an absent household.
        let settings = self.settings().get_or_create(household_id).await?;
        Ok(Some(settings))
    }
}

#[async_trait]
impl MemberWorkloadProvider for DAL {
    async fn list_members_with_workload(
        &self,
        household_id: &str,
    ) -> Result<Vec<Member>, ProviderError> {
        Ok(self.members().list_by_household(household_id).await?)
    }
}

#[async_trait]
impl AssignmentRecorder for DAL {
    async fn increment_workload(
        &self,
        household_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<(), ProviderError> {
        Ok(self
            .members()
            .increment_workload(household_id, user_id, amount, Utc::now())
            .await?)
    }

    async fn record_history(&self, entry: NewAssignmentHistory) -> Result<(), ProviderError> {
        let _: AssignmentHistory = self.history().record(entry).await?;
        Ok(())
    }
}
