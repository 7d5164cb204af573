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

//! Strategy-dependent selection over the ranked score list.

use crate::engine::sources::RandomSource;
use crate::models::{FairnessAlgorithm, ScoredMember};

/// Selects one member from the ranked (descending-by-score) list according
/// to the configured fairness algorithm.
///
/// Returns `None` when the list is empty; the engine reports that as
/// `NoEligibleMembers` rather than selecting anyone.
pub fn select<'a>(
    algorithm: FairnessAlgorithm,
    ranked: &'a [ScoredMember],
    random: &dyn RandomSource,
) -> Option<&'a ScoredMember> {
    let top = ranked.first()?;
    Some(match algorithm {
        FairnessAlgorithm::Balanced => top,
        FairnessAlgorithm::RoundRobin => select_round_robin(ranked),
        FairnessAlgorithm::Weighted => select_weighted(ranked, random),
    })
}

/// Earliest `last_assignment_at` wins; `None` (never assigned) beats any
/// timestamp. Ties fall to the higher-scored member, which is whichever
/// candidate appears first in the ranked list.
fn select_round_robin(ranked: &[ScoredMember]) -> &ScoredMember {
    let mut best = &ranked[0];
    for candidate in &ranked[1..] {
        let earlier = match (candidate.last_assignment_at, best.last_assignment_at) {
            (None, Some(_)) => true,
            (Some(_), None) | (None, None) => false,
            (Some(c), Some(b)) => c < b,
        };
        if earlier {
            best = candidate;
        }
    }
    best
}

/// Weighted-random draw using the clamped scores as weights: draw
/// `r ~ Uniform(0, total)` and walk the list subtracting each score until
/// `r` is exhausted. Falls back to the top-ranked member when every score
/// is zero.
fn select_weighted<'a>(ranked: &'a [ScoredMember], random: &dyn RandomSource) -> &'a ScoredMember {
    let total: f64 = ranked.iter().map(|m| m.score).sum();
    if total <= 0.0 {
        return &ranked[0];
    }

    let mut remaining = random.next_f64() * total;
    for member in ranked {
        remaining -= member.score;
        if remaining <= 0.0 {
            return member;
        }
    }
    // Floating-point slack can leave a sliver of `remaining`.
    &ranked[ranked.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sources::{FixedRandom, SequenceRandom};
    use crate::models::ScoreBreakdown;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn pick<'a>(
        algorithm: FairnessAlgorithm,
        ranked: &'a [ScoredMember],
        random: &dyn RandomSource,
    ) -> &'a ScoredMember {
        select(algorithm, ranked, random).expect("non-empty ranking")
    }

    fn scored(user_id: &str, score: f64, last: Option<DateTime<Utc>>) -> ScoredMember {
        ScoredMember {
            user_id: user_id.to_string(),
            display_name: user_id.to_uppercase(),
            score,
            last_assignment_at: last,
            breakdown: ScoreBreakdown::default(),
        }
    }

    #[test]
    fn balanced_picks_top_of_ranking() {
        let ranked = vec![scored("a", 90.0, None), scored("b", 50.0, None)];
        let picked = pick(FairnessAlgorithm::Balanced, &ranked, &FixedRandom(0.0));
        assert_eq!(picked.user_id, "a");
    }

    #[test]
    fn round_robin_null_timestamp_always_wins() {
        // "b" has never been assigned and must win despite the lowest score.
        let ranked = vec![
            scored("a", 120.0, Some(now() - Duration::days(5))),
            scored("c", 80.0, Some(now() - Duration::days(1))),
            scored("b", 10.0, None),
        ];
        let picked = pick(FairnessAlgorithm::RoundRobin, &ranked, &FixedRandom(0.0));
        assert_eq!(picked.user_id, "b");
    }

    #[test]
    fn round_robin_picks_earliest_timestamp() {
        let ranked = vec![
            scored("recent", 100.0, Some(now() - Duration::days(1))),
            scored("stale", 60.0, Some(now() - Duration::days(9))),
        ];
        let picked = pick(FairnessAlgorithm::RoundRobin, &ranked, &FixedRandom(0.0));
        assert_eq!(picked.user_id, "stale");
    }

    #[test]
    fn round_robin_breaks_timestamp_ties_by_score() {
        let last = Some(now() - Duration::days(3));
        let ranked = vec![scored("high", 100.0, last), scored("low", 40.0, last)];
        let picked = pick(FairnessAlgorithm::RoundRobin, &ranked, &FixedRandom(0.0));
        assert_eq!(picked.user_id, "high");
    }

    #[test]
    fn round_robin_breaks_never_assigned_ties_by_score() {
        let ranked = vec![scored("high", 100.0, None), scored("low", 40.0, None)];
        let picked = pick(FairnessAlgorithm::RoundRobin, &ranked, &FixedRandom(0.0));
        assert_eq!(picked.user_id, "high");
    }

    #[test]
    fn weighted_draw_walks_the_score_mass() {
        let ranked = vec![scored("a", 60.0, None), scored("b", 40.0, None)];
        // Total mass 100: a draw of 0.30 lands in "a", 0.75 lands in "b".
        let picked = pick(FairnessAlgorithm::Weighted, &ranked, &FixedRandom(0.30));
        assert_eq!(picked.user_id, "a");
        let picked = pick(FairnessAlgorithm::Weighted, &ranked, &FixedRandom(0.75));
        assert_eq!(picked.user_id, "b");
    }

    #[test]
    fn weighted_never_selects_zero_score_when_mass_exists() {
        let ranked = vec![scored("a", 50.0, None), scored("zero", 0.0, None)];
        let draws = SequenceRandom::new(vec![0.0, 0.25, 0.5, 0.75, 0.9999]);
        for _ in 0..5 {
            let picked = pick(FairnessAlgorithm::Weighted, &ranked, &draws);
            assert_eq!(picked.user_id, "a");
        }
    }

    #[test]
    fn empty_ranking_selects_nobody() {
        for algorithm in [
            FairnessAlgorithm::Balanced,
            FairnessAlgorithm::RoundRobin,
            FairnessAlgorithm::Weighted,
        ] {
            assert!(select(algorithm, &[], &FixedRandom(0.5)).is_none());
        }
    }

    #[test]
    fn weighted_all_zero_falls_back_to_first() {
        let ranked = vec![scored("a", 0.0, None), scored("b", 0.0, None)];
        let picked = pick(FairnessAlgorithm::Weighted, &ranked, &FixedRandom(0.9));
        assert_eq!(picked.user_id, "a");
    }
}
