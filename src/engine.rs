use rustc_hash::FxHashMap;

use crate::{
    Affiliations, ContestRecord, EloRating, Outcome, RatedContest, RatingSystem, SubjectId,
};

/// Whether the source of a contest stream records ties at all.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Ties {
    #[default]
    Recorded,
    /// Every contest is decisive, regardless of [`ContestRecord::is_tie`].
    NotRecorded,
}

/// Current rating of an individual within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingState {
    pub rating: EloRating,
    /// Number of contests the individual took part in so far.
    pub match_number: u32,
}

impl RatingState {
    fn new(rating: EloRating) -> RatingState {
        RatingState {
            rating,
            match_number: 0,
        }
    }

    fn record(&mut self, rating: EloRating) -> u32 {
        self.rating = rating;
        self.match_number += 1;
        self.match_number
    }
}

/// Replays the contests of one group in order.
///
/// Ratings are private to the engine: individuals that also appear in
/// another group start over at the default rating there.
pub struct SequentialRatingEngine<'a, S> {
    rating_system: &'a RatingSystem,
    affiliations: &'a Affiliations,
    ties: Ties,
    states: FxHashMap<SubjectId, RatingState>,
    last_session: Option<S>,
}

impl<'a, S: Clone + PartialEq> SequentialRatingEngine<'a, S> {
    pub fn new(
        rating_system: &'a RatingSystem,
        affiliations: &'a Affiliations,
        ties: Ties,
    ) -> SequentialRatingEngine<'a, S> {
        SequentialRatingEngine {
            rating_system,
            affiliations,
            ties,
            states: FxHashMap::default(),
            last_session: None,
        }
    }

    /// Rates all `contests`, which must be in the order they happened.
    pub fn run<'c, X, I>(&mut self, contests: I) -> Vec<RatedContest<S, X>>
    where
        I: IntoIterator<Item = &'c ContestRecord<S, X>>,
        S: 'c,
        X: Clone + 'c,
    {
        let contests = contests.into_iter();
        let mut rated = Vec::with_capacity(2 * contests.size_hint().0);
        for contest in contests {
            rated.extend(self.contest(contest));
        }
        rated
    }

    /// Rates the next contest of the stream. Returns the row of the winner
    /// followed by the row of the loser.
    pub fn contest<X: Clone>(&mut self, contest: &ContestRecord<S, X>) -> [RatedContest<S, X>; 2] {
        let winner_outcome = match self.ties {
            Ties::Recorded if contest.is_tie => Outcome::Tie,
            _ => Outcome::Win,
        };

        let session_number_difference = match self.last_session {
            Some(ref last) if *last == contest.session => 0,
            _ => 1,
        };
        self.last_session = Some(contest.session.clone());

        let pre_winner = self.current(&contest.winner).rating;
        let pre_loser = self.current(&contest.loser).rating;

        let (post_winner, post_loser) =
            self.rating_system
                .update_ratings(pre_winner, pre_loser, winner_outcome.score());

        let winner_matches = self.current(&contest.winner).record(post_winner);
        let loser_matches = self.current(&contest.loser).record(post_loser);

        let winner_group = self.affiliations.group_of(&contest.winner, &contest.group);
        let loser_group = self.affiliations.group_of(&contest.loser, &contest.group);
        let winner_strain = self.affiliations.strain_of(&winner_group).map(str::to_owned);
        let loser_strain = self.affiliations.strain_of(&loser_group).map(str::to_owned);

        let winner_row = RatedContest {
            subject: contest.winner.clone(),
            agent: contest.loser.clone(),
            winner: contest.winner.clone(),
            loser: contest.loser.clone(),
            outcome: winner_outcome,
            pre_rating: pre_winner,
            updated_rating: post_winner,
            total_match_number: winner_matches,
            group: contest.group.clone(),
            subject_group: winner_group.clone(),
            agent_group: loser_group.clone(),
            subject_strain: winner_strain.clone(),
            agent_strain: loser_strain.clone(),
            session: contest.session.clone(),
            session_number_difference,
            extra: contest.extra.clone(),
        };

        let loser_row = RatedContest {
            subject: contest.loser.clone(),
            agent: contest.winner.clone(),
            winner: contest.winner.clone(),
            loser: contest.loser.clone(),
            outcome: winner_outcome.opposite(),
            pre_rating: pre_loser,
            updated_rating: post_loser,
            total_match_number: loser_matches,
            group: contest.group.clone(),
            subject_group: loser_group,
            agent_group: winner_group,
            subject_strain: loser_strain,
            agent_strain: winner_strain,
            session: contest.session.clone(),
            session_number_difference,
            extra: contest.extra.clone(),
        };

        [winner_row, loser_row]
    }

    fn current(&mut self, subject: &SubjectId) -> &mut RatingState {
        let rating_system = self.rating_system;
        self.states
            .entry(subject.clone())
            .or_insert_with(|| RatingState::new(rating_system.new_rating()))
    }

    pub fn state(&self, subject: &str) -> Option<&RatingState> {
        self.states.get(subject)
    }

    /// Final state of every individual seen so far, ordered by identity.
    pub fn snapshot(&self) -> Vec<(SubjectId, RatingState)> {
        let mut snapshot: Vec<_> = self
            .states
            .iter()
            .map(|(subject, state)| (subject.clone(), state.clone()))
            .collect();
        snapshot.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        snapshot
    }
}
