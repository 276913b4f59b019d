use std::{borrow::Borrow, fmt};

use crate::{EloRating, Outcome};

/// Identity token of an individual, such as an ear tag number.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubjectId(Box<str>);

/// Name of the group (cage) in which contests were recorded.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GroupId(Box<str>);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> $name {
                $name(value.into())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> $name {
                $name(value.into_boxed_str())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(SubjectId);
string_id!(GroupId);

/// One recorded contest, as supplied by the data preparation layer.
///
/// `S` is the session key (for example the date of the session), `X` carries
/// arbitrary row metadata through to the output unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ContestRecord<S, X = ()> {
    pub winner: SubjectId,
    pub loser: SubjectId,
    /// Neither side won. `winner` and `loser` are then just the recorded
    /// order of the pair.
    pub is_tie: bool,
    pub session: S,
    /// Group whose contest stream this record belongs to.
    pub group: GroupId,
    pub extra: X,
}

impl<S> ContestRecord<S> {
    pub fn new(
        winner: impl Into<SubjectId>,
        loser: impl Into<SubjectId>,
        session: S,
        group: impl Into<GroupId>,
    ) -> ContestRecord<S> {
        ContestRecord {
            winner: winner.into(),
            loser: loser.into(),
            is_tie: false,
            session,
            group: group.into(),
            extra: (),
        }
    }
}

impl<S, X> ContestRecord<S, X> {
    #[must_use]
    pub fn tie(mut self) -> ContestRecord<S, X> {
        self.is_tie = true;
        self
    }

    #[must_use]
    pub fn with_extra<Y>(self, extra: Y) -> ContestRecord<S, Y> {
        ContestRecord {
            winner: self.winner,
            loser: self.loser,
            is_tie: self.is_tie,
            session: self.session,
            group: self.group,
            extra,
        }
    }
}

/// A contest seen from the point of view of one participant (the subject).
/// Every [`ContestRecord`] yields two of these.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedContest<S, X = ()> {
    pub subject: SubjectId,
    pub agent: SubjectId,
    pub winner: SubjectId,
    pub loser: SubjectId,
    /// Result for the subject.
    pub outcome: Outcome,
    pub pre_rating: EloRating,
    pub updated_rating: EloRating,
    /// Number of contests of the subject so far, including this one.
    pub total_match_number: u32,
    /// Group whose stream produced the contest.
    pub group: GroupId,
    pub subject_group: GroupId,
    pub agent_group: GroupId,
    pub subject_strain: Option<String>,
    pub agent_strain: Option<String>,
    pub session: S,
    /// `1` if the contest starts a new session in its stream, else `0`.
    pub session_number_difference: u8,
    pub extra: X,
}

impl<S, X> RatedContest<S, X> {
    pub fn starts_session(&self) -> bool {
        self.session_number_difference == 1
    }
}
