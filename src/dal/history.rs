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

//! Assignment History Data Access Layer
//!
//! Append-only log of assignment decisions. Rows are inserted once and
//! never updated.

use super::models::{current_timestamp_string, uuid_to_blob, NewSqliteAssignmentHistory, SqliteAssignmentHistory};
use super::DAL;
use crate::database::schema::assignment_history;
use crate::error::StorageError;
use crate::models::{AssignmentHistory, NewAssignmentHistory};
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for assignment history operations.
pub struct HistoryDal<'a> {
    pub dal: &'a DAL,
}

impl<'a> HistoryDal<'a> {
    /// Appends one history row for a decision.
    ///
    /// # Arguments
    /// * `new_history` - The decision to persist
    ///
    /// # Returns
    /// * `Result<AssignmentHistory, StorageError>` - The created record
    pub async fn record(
        &self,
        new_history: NewAssignmentHistory,
    ) -> Result<AssignmentHistory, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;

        let id = Uuid::new_v4();
        let row: SqliteAssignmentHistory = conn
            .interact(move |conn| {
                let new_row = NewSqliteAssignmentHistory {
                    id: uuid_to_blob(&id),
                    task_id: new_history.task_id,
                    household_id: new_history.household_id,
                    assigned_to: new_history.assigned_to,
                    method: new_history.method.as_str().to_string(),
                    workload_score: new_history.workload_score,
                    created_at: current_timestamp_string(),
                };
                diesel::insert_into(assignment_history::table)
                    .values(&new_row)
                    .execute(conn)?;

                assignment_history::table
                    .filter(assignment_history::id.eq(uuid_to_blob(&id)))
                    .first(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.into())
    }

    /// Lists the most recent decisions for a household, newest first.
    ///
    /// # Arguments
    /// * `household_id` - The household to list
    /// * `limit` - Maximum number of rows to return
    pub async fn list_recent(
        &self,
        household_id: &str,
        limit: i64,
    ) -> Result<Vec<AssignmentHistory>, StorageError> {
        let conn = self
            .dal
            .database
            .pool()
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?;
        let household_id = household_id.to_string();

        let rows: Vec<SqliteAssignmentHistory> = conn
            .interact(move |conn| {
                assignment_history::table
                    .filter(assignment_history::household_id.eq(household_id))
                    .order(assignment_history::created_at.desc())
                    .limit(limit)
                    .load(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
