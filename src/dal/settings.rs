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

//! Assignment Settings Data Access Layer
//!
//! Handles the per-household configuration row: lazy creation with
//! defaults on first read, and admin upserts from the settings surface.
//! The engine never deletes settings.

use super::models::{current_timestamp_string, NewSqliteAssignmentSettings, SqliteAssignmentSettings};
use super::DAL;
use crate::database::schema::assignment_settings;
use crate::error::StorageError;
use crate::models::{AssignmentSettings, NewAssignmentSettings};
use diesel::prelude::*;

/// Data Access Layer for assignment settings operations.
pub struct SettingsDal<'a> {
    pub dal: &'a DAL,
}

impl<'a> SettingsDal<'a> {
    /// Retrieves the stored settings for a household, if any.
    ///
    /// # Arguments
    /// * `household_id` - The household to look up
    ///
    /// # Returns
    /// * `Result<Option<AssignmentSettings>, StorageError>` - The stored row, or `None`
    pub async fn get(&self, household_id: &str) -> Result<Option<AssignmentSettings>, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;
        let household_id = household_id.to_string();

        let row: Option<SqliteAssignmentSettings> = conn
            .interact(move |conn| {
                assignment_settings::table
                    .filter(assignment_settings::household_id.eq(household_id))
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.map(Into::into))
    }

    /// Retrieves the settings for a household, materializing the default
    /// row first when none exists (the lazy-create lifecycle).
    ///
    /// # Arguments
    /// * `household_id` - The household to look up
    ///
    /// # Returns
    /// * `Result<AssignmentSettings, StorageError>` - The stored or newly created row
    pub async fn get_or_create(&self, household_id: &str) -> Result<AssignmentSettings, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;
        let household_id = household_id.to_string();

        let row: SqliteAssignmentSettings = conn
            .interact(move |conn| {
                let defaults = to_row(&NewAssignmentSettings::defaults(&household_id));
                // INSERT OR IGNORE keeps the first writer's row under
                // concurrent lazy creation.
                diesel::insert_or_ignore_into(assignment_settings::table)
                    .values(&defaults)
                    .execute(conn)?;

                assignment_settings::table
                    .filter(assignment_settings::household_id.eq(&household_id))
                    .first(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.into())
    }

    /// Creates or replaces the household's settings. The admin write path.
    ///
    /// # Arguments
    /// * `new_settings` - The full settings values to store
    ///
    /// # Returns
    /// * `Result<AssignmentSettings, StorageError>` - The stored row after the write
    pub async fn upsert(
        &self,
        new_settings: NewAssignmentSettings,
    ) -> Result<AssignmentSettings, StorageError> {
        new_settings.validate().map_err(StorageError::Invalid)?;

        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let row: SqliteAssignmentSettings = conn
            .interact(move |conn| {
                let row = to_row(&new_settings);
                let now = row.updated_at.clone();
                diesel::insert_into(assignment_settings::table)
                    .values(&row)
                    .on_conflict(assignment_settings::household_id)
                    .do_update()
                    .set((
                        assignment_settings::enabled.eq(row.enabled),
                        assignment_settings::fairness_algorithm.eq(row.fairness_algorithm.clone()),
                        assignment_settings::consider_workload.eq(row.consider_workload),
                        assignment_settings::consider_recent_assignments
                            .eq(row.consider_recent_assignments),
                        assignment_settings::min_days_between_assignments
                            .eq(row.min_days_between_assignments),
                        assignment_settings::max_consecutive_assignments
                            .eq(row.max_consecutive_assignments),
                        assignment_settings::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                assignment_settings::table
                    .filter(assignment_settings::household_id.eq(&new_settings.household_id))
                    .first(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.into())
    }
}

fn to_row(settings: &NewAssignmentSettings) -> NewSqliteAssignmentSettings {
    let now = current_timestamp_string();
    NewSqliteAssignmentSettings {
        household_id: settings.household_id.clone(),
        enabled: i32::from(settings.enabled),
        fairness_algorithm: settings.fairness_algorithm.as_str().to_string(),
        consider_workload: i32::from(settings.consider_workload),
        consider_recent_assignments: i32::from(settings.consider_recent_assignments),
        min_days_between_assignments: settings.min_days_between_assignments,
        max_consecutive_assignments: settings.max_consecutive_assignments,
        created_at: now.clone(),
        updated_at: now,
    }
}
