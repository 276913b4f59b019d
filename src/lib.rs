//! Sequential Elo ratings for tube test dominance contests.
//!
//! Contests are replayed per group (cage) in the order they happened. Each
//! contest produces two [`RatedContest`] rows, one from the point of view of
//! each participant. The combined table of all groups feeds the
//! [`final_standings`] and the [`pairwise_summaries`].

mod affiliation;
mod contest;
mod engine;
mod interactions;
mod rating;
mod rating_system;
mod runner;
mod score;
mod standings;

pub use affiliation::Affiliations;
pub use contest::{ContestRecord, GroupId, RatedContest, SubjectId};
pub use engine::{RatingState, SequentialRatingEngine, Ties};
pub use interactions::{pairwise_summaries, PairwiseSummary};
pub use rating::{EloRating, RatingDifference};
pub use rating_system::{RatingSystem, RatingSystemBuilder};
pub use runner::{CombinedTable, GroupStream, GroupSummary, MultiGroupRunner, Warning};
pub use score::{Outcome, Score};
pub use standings::{final_standings, Standing};
