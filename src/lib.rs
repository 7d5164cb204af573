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

//! # Fairshare
//!
//! A Rust library for fair household task assignment.
//!
//! Given a household (a fixed group of people sharing recurring chores) and
//! a new task, the [`engine::AssignmentEngine`] selects which member should
//! perform it, balancing historical workload, recency of assignment,
//! explicit preferences, and a configurable fairness strategy, then records
//! the decision for future fairness calculations.
//!
//! ## Architecture
//!
//! - [`engine`]: scoring, strategy selection, and orchestration over three
//!   collaborator traits (settings, member workload, recorder)
//! - [`models`]: plain domain types shared by the engine and callers
//! - [`database`] / [`dal`]: a bundled SQLite implementation of all three
//!   collaborators (feature `sqlite`, on by default)
//! - [`error`]: the error taxonomy per boundary
//!
//! The engine itself is storage-agnostic: bring your own providers by
//! implementing the traits in [`engine::traits`], or use the bundled DAL.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fairshare::database::Database;
//! use fairshare::dal::DAL;
//! use fairshare::engine::{AssignmentEngine, EngineConfig};
//! use fairshare::models::AssignmentRequest;
//! use std::sync::Arc;
//!
//! let database = Database::new("household.db");
//! database.run_migrations().await?;
//!
//! let dal = Arc::new(DAL::new(database));
//! let engine = AssignmentEngine::new(dal.clone(), dal.clone(), dal, EngineConfig::default());
//!
//! let decision = engine
//!     .assign_task(AssignmentRequest::new("house-1", "Vacuum the living room"))
//!     .await?;
//! println!("assigned to {}: {}", decision.display_name, decision.assignment_reason);
//! ```

pub mod engine;
pub mod error;
pub mod models;

#[cfg(feature = "sqlite")]
pub mod dal;
#[cfg(feature = "sqlite")]
pub mod database;

pub use engine::{AssignmentEngine, EngineConfig};
pub use error::{AssignmentError, ProviderError, StorageError};
pub use models::{
    AssignmentDecision, AssignmentRequest, AssignmentSettings, FairnessAlgorithm, Member,
};

use tracing_subscriber::EnvFilter;

/// Initializes a global tracing subscriber.
///
/// Uses the given filter directive, falling back to `RUST_LOG` and then
/// `"info"`. Safe to call more than once; only the first call installs a
/// subscriber.
pub fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
