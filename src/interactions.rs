use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{RatedContest, SubjectId};

/// Head-to-head history of an ordered pair of individuals.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PairwiseSummary {
    pub subject: SubjectId,
    pub agent: SubjectId,
    pub winner: SubjectId,
    pub winner_count: u32,
    pub loser: SubjectId,
    pub loser_count: u32,
    /// Contests between the pair, regardless of who won.
    pub total_count: u32,
    pub draw: bool,
}

struct PairCounts<'a> {
    subject: &'a SubjectId,
    agent: &'a SubjectId,
    winner: &'a SubjectId,
    loser: &'a SubjectId,
    min_count: u32,
    max_count: u32,
    distinct_counts: bool,
}

/// Summarizes the combined table per `(subject, agent)` pair.
///
/// Rows are first counted per `(subject, agent, loser, winner)`. For each
/// pair, the smallest of those counts becomes `winner_count` and the largest
/// `loser_count`, with the winner and loser of the first (lowest sorting)
/// group as representatives. A `loser_count` equal to `total_count` means the
/// series was one-sided and is reset to `0`. The pair is a `draw` if both
/// counts end up equal.
///
/// Summaries that only differ in their pair (typically the same history seen
/// from both sides) are reported once.
pub fn pairwise_summaries<S, X>(records: &[RatedContest<S, X>]) -> Vec<PairwiseSummary> {
    let mut grouped: BTreeMap<(&SubjectId, &SubjectId, &SubjectId, &SubjectId), u32> =
        BTreeMap::new();
    let mut totals: FxHashMap<(&SubjectId, &SubjectId), u32> = FxHashMap::default();

    for record in records {
        *grouped
            .entry((&record.subject, &record.agent, &record.loser, &record.winner))
            .or_default() += 1;
        *totals.entry((&record.subject, &record.agent)).or_default() += 1;
    }

    let mut pairs: Vec<PairCounts<'_>> = Vec::new();
    for ((subject, agent, loser, winner), count) in grouped {
        match pairs.last_mut() {
            Some(pair) if pair.subject == subject && pair.agent == agent => {
                pair.distinct_counts |= count != pair.min_count || count != pair.max_count;
                pair.min_count = pair.min_count.min(count);
                pair.max_count = pair.max_count.max(count);
            }
            _ => pairs.push(PairCounts {
                subject,
                agent,
                winner,
                loser,
                min_count: count,
                max_count: count,
                distinct_counts: false,
            }),
        }
    }

    let mut seen = FxHashSet::default();
    let mut summaries = Vec::with_capacity(pairs.len());

    for pair in pairs {
        if pair.distinct_counts {
            debug!(
                subject = %pair.subject,
                agent = %pair.agent,
                min = pair.min_count,
                max = pair.max_count,
                "pair has differing counts per winner/loser labeling"
            );
        }

        let total_count = totals[&(pair.subject, pair.agent)];
        let winner_count = pair.min_count;
        let loser_count = if pair.max_count == total_count {
            0
        } else {
            pair.max_count
        };

        if !seen.insert((pair.winner, winner_count, pair.loser, loser_count, total_count)) {
            continue;
        }

        summaries.push(PairwiseSummary {
            subject: pair.subject.clone(),
            agent: pair.agent.clone(),
            winner: pair.winner.clone(),
            winner_count,
            loser: pair.loser.clone(),
            loser_count,
            total_count,
            draw: loser_count == winner_count,
        });
    }

    summaries
}
