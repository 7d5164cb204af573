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

//! # Assignment Engine
//!
//! Computes a ranked list of eligible members for a task and selects one
//! according to the household's configured fairness strategy, then records
//! the outcome for future fairness calculations.
//!
//! The engine holds no state of its own between calls and never caches
//! member or settings snapshots; stale fairness state would directly
//! undermine the feature. Each `assign_task` call is a single transaction
//! over externally supplied state: fetch settings, fetch members, score,
//! select, record.
//!
//! ## Cancellation
//!
//! Every await point is a collaborator call. Dropping the future returned
//! by [`AssignmentEngine::assign_task`] (e.g. losing a `tokio::select!`)
//! aborts the in-flight call; the Recorder write runs last, so no partial
//! recording happens after cancellation is observed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fairshare::engine::{AssignmentEngine, EngineConfig};
//! use fairshare::models::AssignmentRequest;
//! use std::sync::Arc;
//!
//! let dal = Arc::new(fairshare::dal::DAL::new(database));
//! let engine = AssignmentEngine::new(dal.clone(), dal.clone(), dal, EngineConfig::default());
//!
//! let decision = engine
//!     .assign_task(AssignmentRequest::new("house-1", "Take out the trash"))
//!     .await?;
//! println!("{} -> {}", decision.assigned_to, decision.assignment_reason);
//! ```

pub mod scoring;
pub mod sources;
pub mod strategy;
pub mod traits;

pub use sources::{Clock, FixedClock, FixedRandom, RandomSource, SequenceRandom, SystemClock, ThreadRandom};
pub use traits::{AssignmentRecorder, MemberWorkloadProvider, SettingsProvider};

use crate::error::{AssignmentError, ProviderError};
use crate::models::{
    AssignmentDecision, AssignmentRequest, AssignmentSettings, Member, NewAssignmentHistory,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timeout applied to each collaborator call. On expiry the call maps
    /// to `SettingsUnavailable` / `MembersUnavailable`, which are
    /// retryable by the caller.
    pub provider_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            provider_timeout: Duration::from_secs(10),
        }
    }
}

/// The fair task-assignment engine.
///
/// A pure function of its inputs plus one source of randomness and one
/// source of "now", both injected so tests can pin them.
pub struct AssignmentEngine {
    settings: Arc<dyn SettingsProvider>,
    members: Arc<dyn MemberWorkloadProvider>,
    recorder: Arc<dyn AssignmentRecorder>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: EngineConfig,
}

impl AssignmentEngine {
    /// Creates an engine with the production clock and randomness source.
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        members: Arc<dyn MemberWorkloadProvider>,
        recorder: Arc<dyn AssignmentRecorder>,
        config: EngineConfig,
    ) -> Self {
        Self::with_sources(
            settings,
            members,
            recorder,
            config,
            Arc::new(SystemClock),
            Arc::new(ThreadRandom),
        )
    }

    /// Creates an engine with explicit clock and randomness sources.
    /// Deterministic given fixed sources, member set, and settings.
    pub fn with_sources(
        settings: Arc<dyn SettingsProvider>,
        members: Arc<dyn MemberWorkloadProvider>,
        recorder: Arc<dyn AssignmentRecorder>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        AssignmentEngine {
            settings,
            members,
            recorder,
            clock,
            random,
            config,
        }
    }

    /// Selects the member who should perform the requested task.
    ///
    /// On success exactly one member is returned, along with the full
    /// ranked score list. The decision is recorded through the
    /// [`AssignmentRecorder`] best-effort: a recorder failure is logged
    /// and reflected in `AssignmentDecision::recorded`, never propagated,
    /// since the assignment has already been decided.
    pub async fn assign_task(
        &self,
        request: AssignmentRequest,
    ) -> Result<AssignmentDecision, AssignmentError> {
        if request.household_id.trim().is_empty() {
            return Err(AssignmentError::InvalidRequest(
                "household_id must not be blank".to_string(),
            ));
        }

        let settings = self.fetch_settings(&request.household_id).await?;
        if !settings.enabled {
            // Short-circuit before touching the workload provider.
            return Err(AssignmentError::AssignmentDisabled {
                household_id: request.household_id.clone(),
            });
        }

        let all_members = self.fetch_members(&request.household_id).await?;
        if all_members.is_empty() {
            return Err(AssignmentError::NoEligibleMembers {
                household_id: request.household_id.clone(),
            });
        }

        let eligible: Vec<Member> = all_members
            .iter()
            .filter(|m| !request.exclude_user_ids.contains(&m.user_id))
            .cloned()
            .collect();
        if eligible.is_empty() {
            return Err(AssignmentError::NoEligibleMembers {
                household_id: request.household_id.clone(),
            });
        }

        let now = self.clock.now();
        let ranking = scoring::rank_members(
            &all_members,
            &eligible,
            &settings,
            &request,
            now,
            self.random.as_ref(),
        );
        debug!(
            household_id = %request.household_id,
            eligible = ranking.len(),
            algorithm = %settings.fairness_algorithm,
            "scored eligible members"
        );

        let selected = strategy::select(settings.fairness_algorithm, &ranking, self.random.as_ref())
            .ok_or_else(|| AssignmentError::NoEligibleMembers {
                household_id: request.household_id.clone(),
            })?
            .clone();
        let effort = request.normalized_effort();
        let recorded = self.record_decision(&request, &selected, &settings, effort).await;

        let reason = scoring::assignment_reason(&selected, settings.fairness_algorithm);
        info!(
            household_id = %request.household_id,
            assigned_to = %selected.user_id,
            score = selected.score,
            method = %settings.fairness_algorithm,
            task = %request.task_title,
            "task assigned"
        );

        Ok(AssignmentDecision {
            household_id: request.household_id,
            assigned_to: selected.user_id.clone(),
            display_name: selected.display_name.clone(),
            method: settings.fairness_algorithm,
            score: selected.score,
            assignment_reason: reason,
            ranking,
            recorded,
            decided_at: now,
        })
    }

    /// Returns the household's stored settings, or the hard-coded defaults
    /// when none exist. The engine has no settings write channel, so the
    /// defaults are not persisted here; the storage layer creates the row
    /// lazily on its own read path.
    pub async fn get_or_create_settings(
        &self,
        household_id: &str,
    ) -> Result<AssignmentSettings, AssignmentError> {
        self.fetch_settings(household_id).await
    }

    async fn fetch_settings(
        &self,
        household_id: &str,
    ) -> Result<AssignmentSettings, AssignmentError> {
        match self
            .with_timeout(self.settings.get_settings(household_id))
            .await
        {
            Ok(Some(settings)) => Ok(settings),
            Ok(None) => Ok(AssignmentSettings::default_for(household_id, self.clock.now())),
            Err(source) => Err(AssignmentError::SettingsUnavailable { source }),
        }
    }

    async fn fetch_members(&self, household_id: &str) -> Result<Vec<Member>, AssignmentError> {
        self.with_timeout(self.members.list_members_with_workload(household_id))
            .await
            .map_err(|source| AssignmentError::MembersUnavailable { source })
    }

    /// Best-effort recording. Returns whether both writes landed.
    async fn record_decision(
        &self,
        request: &AssignmentRequest,
        selected: &crate::models::ScoredMember,
        settings: &AssignmentSettings,
        effort: f64,
    ) -> bool {
        let mut recorded = true;

        if let Err(error) = self
            .with_timeout(self.recorder.increment_workload(
                &request.household_id,
                &selected.user_id,
                effort,
            ))
            .await
        {
            warn!(
                household_id = %request.household_id,
                user_id = %selected.user_id,
                %error,
                "failed to record workload increment; decision stands"
            );
            recorded = false;
        }

        if request.task_id.is_some() {
            let entry = NewAssignmentHistory {
                task_id: request.task_id.clone(),
                household_id: request.household_id.clone(),
                assigned_to: selected.user_id.clone(),
                method: settings.fairness_algorithm,
                workload_score: selected.score,
            };
            if let Err(error) = self.with_timeout(self.recorder.record_history(entry)).await {
                warn!(
                    household_id = %request.household_id,
                    user_id = %selected.user_id,
                    %error,
                    "failed to record assignment history; decision stands"
                );
                recorded = false;
            }
        }

        recorded
    }

    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match tokio::time::timeout(self.config.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        }
    }
}
