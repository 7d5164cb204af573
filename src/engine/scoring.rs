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

//! Fairness scoring.
//!
//! Every eligible member starts from a base score of 100 which is then
//! adjusted by workload, recency, preference, and completion-rate factors
//! plus a small random jitter. The workload mean is computed over the whole
//! household, not just eligible members, so averages stay stable when a
//! request excludes someone.

use crate::engine::sources::RandomSource;
use crate::models::{
    AssignmentRequest, AssignmentSettings, FairnessAlgorithm, Member, ScoreBreakdown, ScoredMember,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Starting score for every member.
pub const BASE_SCORE: f64 = 100.0;
/// Points lost per unit of workload above the household mean.
pub const WORKLOAD_WEIGHT: f64 = 10.0;
/// Points lost per currently open task.
pub const CURRENT_TASK_PENALTY: f64 = 15.0;
/// Flat penalty while inside the cooldown window.
pub const COOLDOWN_PENALTY: f64 = 50.0;
/// Bonus per day since the last assignment, outside the cooldown window.
pub const GAP_BONUS_PER_DAY: f64 = 5.0;
/// Cap on the gap bonus.
pub const GAP_BONUS_CAP: f64 = 30.0;
/// Bonus for members the request prefers.
pub const PREFERENCE_BONUS: f64 = 25.0;
/// Maximum completion-rate bonus (at a 100% completion rate).
pub const COMPLETION_BONUS: f64 = 20.0;
/// Upper bound (exclusive) of the tie-breaking jitter.
pub const JITTER_RANGE: f64 = 10.0;

/// Scores the eligible members and returns them sorted descending by score.
///
/// The sort is stable, so given identical random draws the ordering is
/// fully determined by the provider's member order.
pub fn rank_members(
    all_members: &[Member],
    eligible: &[Member],
    settings: &AssignmentSettings,
    request: &AssignmentRequest,
    now: DateTime<Utc>,
    random: &dyn RandomSource,
) -> Vec<ScoredMember> {
    let workload_mean = if all_members.is_empty() {
        0.0
    } else {
        all_members
            .iter()
            .map(|m| m.total_workload_score)
            .sum::<f64>()
            / all_members.len() as f64
    };

    let mut scored: Vec<ScoredMember> = eligible
        .iter()
        .map(|member| score_member(member, workload_mean, settings, request, now, random))
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

fn score_member(
    member: &Member,
    workload_mean: f64,
    settings: &AssignmentSettings,
    request: &AssignmentRequest,
    now: DateTime<Utc>,
    random: &dyn RandomSource,
) -> ScoredMember {
    let mut breakdown = ScoreBreakdown::default();
    let mut score = BASE_SCORE;

    if settings.consider_workload {
        breakdown.workload_adjustment =
            -WORKLOAD_WEIGHT * (member.total_workload_score - workload_mean);
        breakdown.current_task_penalty =
            -CURRENT_TASK_PENALTY * f64::from(member.current_tasks_count);
        score += breakdown.workload_adjustment + breakdown.current_task_penalty;
    }

    if settings.consider_recent_assignments {
        if let Some(last) = member.last_assignment_at {
            let days = (now - last).num_days();
            breakdown.recency_adjustment = if days < i64::from(settings.min_days_between_assignments)
            {
                // Soft cooldown: a heavy penalty, not a hard exclusion, so
                // very small households can still assign someone.
                -COOLDOWN_PENALTY
            } else {
                (days as f64 * GAP_BONUS_PER_DAY).min(GAP_BONUS_CAP)
            };
            score += breakdown.recency_adjustment;
        }
    }

    if request.prefer_user_ids.contains(&member.user_id) {
        breakdown.preference_bonus = PREFERENCE_BONUS;
        score += PREFERENCE_BONUS;
    }

    if let Some(rate) = member.completion_rate() {
        breakdown.completion_bonus = COMPLETION_BONUS * rate;
        score += breakdown.completion_bonus;
    }

    breakdown.jitter = JITTER_RANGE * random.next_f64();
    score += breakdown.jitter;

    ScoredMember {
        user_id: member.user_id.clone(),
        display_name: member.display_name.clone(),
        score: score.max(0.0),
        last_assignment_at: member.last_assignment_at,
        breakdown,
    }
}

/// Builds the advisory explanation string from the non-trivial factors of
/// the selected member.
pub fn assignment_reason(selected: &ScoredMember, method: FairnessAlgorithm) -> String {
    let mut parts: Vec<&str> = vec![match method {
        FairnessAlgorithm::Balanced => "highest fairness score",
        FairnessAlgorithm::RoundRobin => "longest wait in rotation",
        FairnessAlgorithm::Weighted => "score-weighted draw",
    }];

    let breakdown = &selected.breakdown;
    if breakdown.workload_adjustment > 0.0 {
        parts.push("balanced workload distribution");
    }
    if breakdown.recency_adjustment > 0.0 {
        parts.push("time since last assignment");
    }
    if breakdown.recency_adjustment < 0.0 {
        parts.push("selected despite recent assignment");
    }
    if breakdown.preference_bonus > 0.0 {
        parts.push("caller preference");
    }
    if breakdown.completion_bonus > COMPLETION_BONUS / 2.0 {
        parts.push("reliable completion history");
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sources::FixedRandom;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn member(user_id: &str, workload: f64, current: i32) -> Member {
        Member {
            user_id: user_id.to_string(),
            display_name: user_id.to_uppercase(),
            current_tasks_count: current,
            completed_tasks_count: 0,
            total_workload_score: workload,
            last_assignment_at: None,
        }
    }

    fn settings(consider_workload: bool, consider_recent: bool) -> AssignmentSettings {
        let mut s = AssignmentSettings::default_for("house-1", now());
        s.consider_workload = consider_workload;
        s.consider_recent_assignments = consider_recent;
        s
    }

    fn request() -> AssignmentRequest {
        AssignmentRequest::new("house-1", "Dishes")
    }

    #[test]
    fn lower_workload_scores_higher() {
        let members = vec![member("a", 10.0, 0), member("b", 2.0, 0)];
        let ranked = rank_members(
            &members,
            &members,
            &settings(true, false),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].user_id, "b");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn cooldown_applies_exact_penalty() {
        let mut inside = member("inside", 0.0, 0);
        inside.last_assignment_at = Some(now() - Duration::hours(6));

        let members = vec![inside];
        let ranked = rank_members(
            &members,
            &members,
            &settings(false, true),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].breakdown.recency_adjustment, -COOLDOWN_PENALTY);
        assert_eq!(ranked[0].score, BASE_SCORE - COOLDOWN_PENALTY);
    }

    #[test]
    fn gap_bonus_grows_then_caps() {
        for (days, expected) in [(1i64, 5.0), (3, 15.0), (6, 30.0), (40, 30.0)] {
            let mut m = member("m", 0.0, 0);
            m.last_assignment_at = Some(now() - Duration::days(days));
            let members = vec![m];
            let ranked = rank_members(
                &members,
                &members,
                &settings(false, true),
                &request(),
                now(),
                &FixedRandom(0.0),
            );
            assert_eq!(
                ranked[0].breakdown.recency_adjustment, expected,
                "gap of {} days",
                days
            );
        }
    }

    #[test]
    fn never_assigned_member_has_no_recency_factor() {
        let members = vec![member("fresh", 0.0, 0)];
        let ranked = rank_members(
            &members,
            &members,
            &settings(false, true),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].breakdown.recency_adjustment, 0.0);
    }

    #[test]
    fn preference_bonus_applies() {
        let members = vec![member("a", 0.0, 0), member("b", 0.0, 0)];
        let ranked = rank_members(
            &members,
            &members,
            &settings(false, false),
            &request().preferring("b"),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].user_id, "b");
        assert_eq!(ranked[0].breakdown.preference_bonus, PREFERENCE_BONUS);
    }

    #[test]
    fn completion_rate_rewards_finishers() {
        let mut finisher = member("finisher", 0.0, 0);
        finisher.completed_tasks_count = 3;
        finisher.current_tasks_count = 1;

        let members = vec![finisher];
        let ranked = rank_members(
            &members,
            &members,
            &settings(false, false),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        // 3 of 4 tasks finished: 20 * 0.75
        assert_eq!(ranked[0].breakdown.completion_bonus, 15.0);
    }

    #[test]
    fn score_clamps_at_zero() {
        let members = vec![member("swamped", 1000.0, 10)];
        let ranked = rank_members(
            &members,
            &members,
            &settings(true, false),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn workload_mean_uses_all_members_not_just_eligible() {
        let all = vec![member("a", 9.0, 0), member("b", 0.0, 0), member("c", 0.0, 0)];
        // Excluding "a" must not shift the mean (stays 3.0).
        let eligible = vec![all[1].clone(), all[2].clone()];
        let ranked = rank_members(
            &all,
            &eligible,
            &settings(true, false),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        // -10 * (0 - 3) = +30 for both remaining members.
        assert_eq!(ranked[0].breakdown.workload_adjustment, 30.0);
        assert_eq!(ranked[1].breakdown.workload_adjustment, 30.0);
    }

    #[test]
    fn jitter_is_scaled_into_range() {
        let members = vec![member("m", 0.0, 0)];
        let ranked = rank_members(
            &members,
            &members,
            &settings(false, false),
            &request(),
            now(),
            &FixedRandom(0.999),
        );
        assert!(ranked[0].breakdown.jitter < JITTER_RANGE);
        assert!(ranked[0].breakdown.jitter > 9.9);
    }

    #[test]
    fn documented_household_scenario_ranks_b_first() {
        // A: workload 10, 2 open tasks; B: workload 2, none; C: workload 6, 1.
        let members = vec![
            member("a", 10.0, 2),
            member("b", 2.0, 0),
            member("c", 6.0, 1),
        ];
        let ranked = rank_members(
            &members,
            &members,
            &settings(true, false),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        assert_eq!(ranked[0].user_id, "b");
        assert_eq!(ranked[0].score, 140.0);
        assert_eq!(ranked[1].user_id, "c");
        assert_eq!(ranked[1].score, 85.0);
        assert_eq!(ranked[2].user_id, "a");
        assert_eq!(ranked[2].score, 30.0);
    }

    #[test]
    fn reason_mentions_contributing_factors() {
        let mut m = member("b", 2.0, 0);
        m.last_assignment_at = Some(now() - Duration::days(4));
        let all = vec![member("a", 10.0, 2), m];
        let ranked = rank_members(
            &all,
            &all,
            &settings(true, true),
            &request(),
            now(),
            &FixedRandom(0.0),
        );
        let reason = assignment_reason(&ranked[0], FairnessAlgorithm::Balanced);
        assert!(reason.contains("highest fairness score"));
        assert!(reason.contains("balanced workload distribution"));
        assert!(reason.contains("time since last assignment"));
    }
}
