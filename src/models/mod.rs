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

//! Domain models for households, members, settings, and assignment records.
//!
//! These are plain domain types used by the engine and its callers. They
//! carry no Diesel derives; the SQLite row representations live in the DAL
//! and are converted at that boundary.

pub mod assignment;
pub mod assignment_history;
pub mod assignment_settings;
pub mod member;

pub use assignment::{AssignmentDecision, AssignmentRequest, ScoreBreakdown, ScoredMember};
pub use assignment_history::{AssignmentHistory, NewAssignmentHistory};
pub use assignment_settings::{
    AssignmentSettings, FairnessAlgorithm, NewAssignmentSettings, UnknownAlgorithm,
};
pub use member::Member;
