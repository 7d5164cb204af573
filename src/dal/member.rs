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

//! Household Member Data Access Layer
//!
//! Workload counters move only through in-place atomic UPDATEs
//! (`SET col = col + ?`), never read-modify-write, so concurrent
//! assignment decisions cannot lose updates.

use super::models::{
    current_timestamp_string, datetime_to_string, uuid_to_blob, NewSqliteHouseholdMember,
    SqliteHouseholdMember,
};
use super::DAL;
use crate::database::schema::household_members;
use crate::error::StorageError;
use crate::models::Member;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use uuid::Uuid;

/// Data Access Layer for household member workload operations.
pub struct MemberDal<'a> {
    pub dal: &'a DAL,
}

impl<'a> MemberDal<'a> {
    /// Adds a member to a household with zeroed workload counters.
    ///
    /// # Arguments
    /// * `household_id` - The household to add to
    /// * `user_id` - Opaque user identifier, unique within the household
    /// * `display_name` - Name shown in assignment reasons
    ///
    /// # Returns
    /// * `Result<Member, StorageError>` - The created member
    pub async fn add_member(
        &self,
        household_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> Result<Member, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let household_id = household_id.to_string();
        let user_id = user_id.to_string();
        let display_name = display_name.to_string();

        let row: SqliteHouseholdMember = conn
            .interact(move |conn| {
                let now = current_timestamp_string();
                let new_member = NewSqliteHouseholdMember {
                    id: uuid_to_blob(&Uuid::new_v4()),
                    household_id: household_id.clone(),
                    user_id: user_id.clone(),
                    display_name,
                    current_tasks_count: 0,
                    completed_tasks_count: 0,
                    total_workload_score: 0.0,
                    last_assignment_at: None,
                    created_at: now.clone(),
                    updated_at: now,
                };
                diesel::insert_into(household_members::table)
                    .values(&new_member)
                    .execute(conn)?;

                household_members::table
                    .filter(household_members::household_id.eq(&household_id))
                    .filter(household_members::user_id.eq(&user_id))
                    .first(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.into())
    }

    /// Retrieves a single member with current workload counters.
    pub async fn get(
        &self,
        household_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let household_id = household_id.to_string();
        let user_id = user_id.to_string();

        let row: Option<SqliteHouseholdMember> = conn
            .interact(move |conn| {
                household_members::table
                    .filter(household_members::household_id.eq(household_id))
                    .filter(household_members::user_id.eq(user_id))
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.map(Into::into))
    }

    /// Lists every member of a household with workload counters.
    ///
    /// Ordered by join time so the engine's stable sort sees a
    /// deterministic input order. An empty result is a valid empty
    /// household, not an error.
    pub async fn list_by_household(&self, household_id: &str) -> Result<Vec<Member>, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;
        let household_id = household_id.to_string();

        let rows: Vec<SqliteHouseholdMember> = conn
            .interact(move |conn| {
                household_members::table
                    .filter(household_members::household_id.eq(household_id))
                    .order((
                        household_members::created_at.asc(),
                        household_members::user_id.asc(),
                    ))
                    .load(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applies an assignment to a member's counters in one atomic UPDATE:
    /// adds `amount` to the cumulative workload, opens one more current
    /// task, and stamps `last_assignment_at`.
    ///
    /// # Arguments
    /// * `household_id` - The member's household
    /// * `user_id` - The member to update
    /// * `amount` - Effort-weighted workload increment
    /// * `assigned_at` - Assignment timestamp to stamp
    ///
    /// # Returns
    /// * `Result<(), StorageError>` - `NotFound` when the member does not exist
    pub async fn increment_workload(
        &self,
        household_id: &str,
        user_id: &str,
        amount: f64,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let household_id = household_id.to_string();
        let user_id = user_id.to_string();
        let assigned_at_str = datetime_to_string(&assigned_at);

        let updated_rows = conn
            .interact(move |conn| {
                diesel::update(
                    household_members::table
                        .filter(household_members::household_id.eq(household_id))
                        .filter(household_members::user_id.eq(user_id)),
                )
                .set((
                    household_members::total_workload_score
                        .eq(household_members::total_workload_score + amount),
                    household_members::current_tasks_count
                        .eq(household_members::current_tasks_count + 1),
                    household_members::last_assignment_at.eq(Some(assigned_at_str)),
                    household_members::updated_at.eq(current_timestamp_string()),
                ))
                .execute(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        if updated_rows == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Marks one task completed for a member: decrements the open-task
    /// count (floored at zero) and increments the lifetime completed
    /// count, atomically. The external completion path.
    pub async fn complete_task(
        &self,
        household_id: &str,
        user_id: &str,
    ) -> Result<(), StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let household_id = household_id.to_string();
        let user_id = user_id.to_string();

        let updated_rows = conn
            .interact(move |conn| {
                diesel::sql_query(
                    "UPDATE household_members \
                     SET current_tasks_count = MAX(current_tasks_count - 1, 0), \
                         completed_tasks_count = completed_tasks_count + 1, \
                         updated_at = ? \
                     WHERE household_id = ? AND user_id = ?",
                )
                .bind::<Text, _>(current_timestamp_string())
                .bind::<Text, _>(household_id)
                .bind::<Text, _>(user_id)
                .execute(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        if updated_rows == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
