use std::{fmt, ops::Range};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    Affiliations, ContestRecord, GroupId, RatedContest, RatingState, RatingSystem,
    SequentialRatingEngine, SubjectId, Ties,
};

/// The ordered contests of one group.
#[derive(Debug, Clone)]
pub struct GroupStream<S, X = ()> {
    pub group: GroupId,
    pub ties: Ties,
    pub contests: Vec<ContestRecord<S, X>>,
}

impl<S, X> GroupStream<S, X> {
    pub fn new(group: impl Into<GroupId>, ties: Ties) -> GroupStream<S, X> {
        GroupStream {
            group: group.into(),
            ties,
            contests: Vec::new(),
        }
    }
}

/// Data quality problems that do not prevent rating.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Warning {
    /// The group's source has no tie information, so all its contests were
    /// rated as decisive.
    TiesNotRecorded { group: GroupId },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TiesNotRecorded { group } => write!(
                f,
                "no tie information for group {group}, all contests rated as decisive"
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub group: GroupId,
    /// Rows of this group in [`CombinedTable::records`].
    pub records: Range<usize>,
    pub snapshot: Vec<(SubjectId, RatingState)>,
}

/// Rated contests of all groups, concatenated in group processing order.
#[derive(Debug, Clone)]
pub struct CombinedTable<S, X = ()> {
    pub records: Vec<RatedContest<S, X>>,
    pub groups: Vec<GroupSummary>,
    /// Earliest and latest session key over all groups.
    pub session_range: Option<(S, S)>,
    pub warnings: Vec<Warning>,
}

impl<S, X> CombinedTable<S, X> {
    pub fn group_records(&self, summary: &GroupSummary) -> &[RatedContest<S, X>] {
        &self.records[summary.records.clone()]
    }
}

/// Rates every group independently. Groups are processed in parallel, the
/// contests of a single group strictly in order.
pub struct MultiGroupRunner<'a> {
    rating_system: &'a RatingSystem,
    affiliations: &'a Affiliations,
}

impl<'a> MultiGroupRunner<'a> {
    pub fn new(rating_system: &'a RatingSystem, affiliations: &'a Affiliations) -> MultiGroupRunner<'a> {
        MultiGroupRunner {
            rating_system,
            affiliations,
        }
    }

    pub fn run<S, X>(&self, streams: &[GroupStream<S, X>]) -> CombinedTable<S, X>
    where
        S: Clone + Ord + Send + Sync,
        X: Clone + Send + Sync,
    {
        let rated: Vec<_> = streams
            .par_iter()
            .map(|stream| {
                let mut engine =
                    SequentialRatingEngine::new(self.rating_system, self.affiliations, stream.ties);
                let records = engine.run(&stream.contests);
                debug!(
                    group = %stream.group,
                    contests = stream.contests.len(),
                    individuals = engine.snapshot().len(),
                    "rated group"
                );
                (records, engine.snapshot())
            })
            .collect();

        let mut table = CombinedTable {
            records: Vec::with_capacity(rated.iter().map(|(records, _)| records.len()).sum()),
            groups: Vec::with_capacity(streams.len()),
            session_range: session_range(streams),
            warnings: Vec::new(),
        };

        for (stream, (records, snapshot)) in streams.iter().zip(rated) {
            if stream.ties == Ties::NotRecorded {
                let warning = Warning::TiesNotRecorded {
                    group: stream.group.clone(),
                };
                warn!("{}", warning);
                table.warnings.push(warning);
            }

            let start = table.records.len();
            table.records.extend(records);
            table.groups.push(GroupSummary {
                group: stream.group.clone(),
                records: start..table.records.len(),
                snapshot,
            });
        }

        table
    }
}

fn session_range<S: Clone + Ord, X>(streams: &[GroupStream<S, X>]) -> Option<(S, S)> {
    let mut sessions = streams
        .iter()
        .flat_map(|stream| stream.contests.iter().map(|contest| &contest.session));
    let first = sessions.next()?;
    let (earliest, latest) = sessions.fold((first, first), |(earliest, latest), session| {
        (earliest.min(session), latest.max(session))
    });
    Some((earliest.clone(), latest.clone()))
}
