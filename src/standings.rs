use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::{EloRating, GroupId, RatedContest, SubjectId};

/// Final rating of an individual and its rank within its group.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub subject: SubjectId,
    pub subject_group: GroupId,
    pub rating: EloRating,
    /// Dense rank by descending rating, starting at `1`.
    pub rank: u32,
}

/// Picks the most recent row of every subject (greatest
/// `total_match_number`, the later row on equality) and ranks the subjects
/// within their group.
///
/// Standings are returned in the order their rows appear in `records`.
pub fn final_standings<S, X>(records: &[RatedContest<S, X>]) -> Vec<Standing> {
    let mut latest: FxHashMap<&SubjectId, usize> = FxHashMap::default();
    for (i, record) in records.iter().enumerate() {
        latest
            .entry(&record.subject)
            .and_modify(|current| {
                if record.total_match_number >= records[*current].total_match_number {
                    *current = i;
                }
            })
            .or_insert(i);
    }

    let mut rows: Vec<usize> = latest.into_values().collect();
    rows.sort_unstable();

    let mut ratings_by_group: BTreeMap<&GroupId, Vec<OrderedFloat<f64>>> = BTreeMap::new();
    for &i in &rows {
        let record = &records[i];
        ratings_by_group
            .entry(&record.subject_group)
            .or_default()
            .push(OrderedFloat(f64::from(record.updated_rating)));
    }
    for ratings in ratings_by_group.values_mut() {
        ratings.sort_unstable_by(|a, b| b.cmp(a));
        ratings.dedup();
    }

    rows.into_iter()
        .map(|i| {
            let record = &records[i];
            let rating = OrderedFloat(f64::from(record.updated_rating));
            let distinct = &ratings_by_group[&record.subject_group];
            let position = distinct
                .binary_search_by(|probe| rating.cmp(probe))
                .unwrap_or_else(|position| position);
            Standing {
                subject: record.subject.clone(),
                subject_group: record.subject_group.clone(),
                rating: record.updated_rating,
                rank: position as u32 + 1,
            }
        })
        .collect()
}
