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

//! Error types for the assignment engine and its collaborators.
//!
//! The taxonomy is split by boundary:
//! - [`AssignmentError`]: what `assign_task` returns to callers
//! - [`ProviderError`]: transport-level failures from the three collaborator
//!   traits (settings, member workload, recorder)
//! - [`StorageError`]: failures inside the SQLite-backed DAL
//!
//! Recorder failures after a successful selection are deliberately absent
//! from [`AssignmentError`]: they are logged and reflected in
//! `AssignmentDecision::recorded` instead of failing the call.

use thiserror::Error;

/// Errors returned by `AssignmentEngine::assign_task` and
/// `AssignmentEngine::get_or_create_settings`.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// Smart assignment is turned off in the household's settings.
    /// Fatal to the call; the caller should prompt to enable it.
    #[error("smart assignment is disabled for household '{household_id}'")]
    AssignmentDisabled { household_id: String },

    /// The household is empty or every member was excluded by the request.
    /// Fatal; the caller must adjust the request or add members.
    #[error("no eligible members in household '{household_id}'")]
    NoEligibleMembers { household_id: String },

    /// The Settings Provider failed or timed out. Retryable.
    #[error("assignment settings unavailable: {source}")]
    SettingsUnavailable {
        #[source]
        source: ProviderError,
    },

    /// The Member Workload Provider failed or timed out. Retryable.
    #[error("member workload unavailable: {source}")]
    MembersUnavailable {
        #[source]
        source: ProviderError,
    },

    /// The request was malformed in a way that has no safe default
    /// (e.g. a blank household id). Malformed effort scores are clamped
    /// instead of rejected.
    #[error("invalid assignment request: {0}")]
    InvalidRequest(String),
}

/// Transport-level failures from a collaborator call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The collaborator did not respond within the configured timeout.
    #[error("collaborator call timed out")]
    Timeout,

    /// A storage-backed collaborator failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Any other transport failure (for non-DAL provider implementations).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors from the SQLite-backed Data Access Layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to check a connection out of the pool, or the pooled
    /// interaction panicked.
    #[error("connection pool error: {0}")]
    ConnectionPool(String),

    /// A query failed.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,

    /// A value failed validation before being written.
    #[error("invalid value: {0}")]
    Invalid(String),
}
