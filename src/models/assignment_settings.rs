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

//! Per-household assignment configuration.
//!
//! One settings row exists per household, created lazily with defaults on
//! first read. Settings are mutated by household admins through an external
//! settings surface; the engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The selection strategy applied after scoring.
///
/// Stored as TEXT (`"balanced"`, `"round_robin"`, `"weighted"`). Unknown
/// strings read from storage fall back to [`FairnessAlgorithm::Balanced`]
/// rather than failing the read; writes reject unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessAlgorithm {
    /// Pick the highest-scoring member.
    Balanced,
    /// Pick the member whose last assignment is oldest; never-assigned
    /// members always win.
    RoundRobin,
    /// Score-weighted random draw over all eligible members.
    Weighted,
}

/// Parse error for [`FairnessAlgorithm`] on the write path.
#[derive(Debug, Error)]
#[error("unknown fairness algorithm: '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FairnessAlgorithm {
    /// The canonical TEXT encoding of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            FairnessAlgorithm::Balanced => "balanced",
            FairnessAlgorithm::RoundRobin => "round_robin",
            FairnessAlgorithm::Weighted => "weighted",
        }
    }

    /// Read-path parse: unknown values fall back to `Balanced` so a bad
    /// row never makes a household unassignable.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(FairnessAlgorithm::Balanced)
    }
}

impl FromStr for FairnessAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(FairnessAlgorithm::Balanced),
            "round_robin" => Ok(FairnessAlgorithm::RoundRobin),
            "weighted" => Ok(FairnessAlgorithm::Weighted),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for FairnessAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-household smart assignment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSettings {
    pub household_id: String,
    /// Master switch; when false, `assign_task` fails with
    /// `AssignmentDisabled` without fetching members.
    pub enabled: bool,
    pub fairness_algorithm: FairnessAlgorithm,
    /// Whether scoring penalizes above-average workload and open tasks.
    pub consider_workload: bool,
    /// Whether scoring applies the cooldown penalty and gap bonus.
    pub consider_recent_assignments: bool,
    /// Cooldown window in days; members assigned more recently than this
    /// take a heavy score penalty (soft cooldown, not a hard filter).
    pub min_days_between_assignments: i32,
    /// Reserved: stored and validated but not consulted by scoring.
    pub max_consecutive_assignments: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssignmentSettings {
    /// The hard-coded defaults used when a household has no stored settings.
    pub fn default_for(household_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        AssignmentSettings {
            household_id: household_id.into(),
            enabled: true,
            fairness_algorithm: FairnessAlgorithm::Balanced,
            consider_workload: true,
            consider_recent_assignments: true,
            min_days_between_assignments: 1,
            max_consecutive_assignments: 3,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Settings values as supplied by an admin on the write path, before the
/// storage layer attaches timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignmentSettings {
    pub household_id: String,
    pub enabled: bool,
    pub fairness_algorithm: FairnessAlgorithm,
    pub consider_workload: bool,
    pub consider_recent_assignments: bool,
    pub min_days_between_assignments: i32,
    pub max_consecutive_assignments: i32,
}

impl NewAssignmentSettings {
    /// Defaults matching [`AssignmentSettings::default_for`].
    pub fn defaults(household_id: impl Into<String>) -> Self {
        NewAssignmentSettings {
            household_id: household_id.into(),
            enabled: true,
            fairness_algorithm: FairnessAlgorithm::Balanced,
            consider_workload: true,
            consider_recent_assignments: true,
            min_days_between_assignments: 1,
            max_consecutive_assignments: 3,
        }
    }

    /// Validates the numeric bounds before a write.
    pub fn validate(&self) -> Result<(), String> {
        if self.household_id.trim().is_empty() {
            return Err("household_id must not be blank".to_string());
        }
        if self.min_days_between_assignments < 0 {
            return Err(format!(
                "min_days_between_assignments must be >= 0, got {}",
                self.min_days_between_assignments
            ));
        }
        if self.max_consecutive_assignments < 1 {
            return Err(format!(
                "max_consecutive_assignments must be >= 1, got {}",
                self.max_consecutive_assignments
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_round_trips_through_text() {
        for algo in [
            FairnessAlgorithm::Balanced,
            FairnessAlgorithm::RoundRobin,
            FairnessAlgorithm::Weighted,
        ] {
            assert_eq!(algo.as_str().parse::<FairnessAlgorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn unknown_algorithm_falls_back_on_read_and_rejects_on_write() {
        assert_eq!(
            FairnessAlgorithm::parse_lossy("fanciest"),
            FairnessAlgorithm::Balanced
        );
        assert!("fanciest".parse::<FairnessAlgorithm>().is_err());
    }

    #[test]
    fn validation_bounds() {
        let mut settings = NewAssignmentSettings::defaults("house-1");
        assert!(settings.validate().is_ok());

        settings.min_days_between_assignments = -1;
        assert!(settings.validate().is_err());

        settings.min_days_between_assignments = 0;
        settings.max_consecutive_assignments = 0;
        assert!(settings.validate().is_err());
    }
}
