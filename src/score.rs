use std::{fmt, ops};

/// A score or expectation value in the range `0.0..=1.0`, where `0.0` is a
/// loss and `1.0` is a win.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl From<Score> for f64 {
    #[inline]
    fn from(Score(score): Score) -> f64 {
        score
    }
}

impl Score {
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);
}

impl ops::Sub<Score> for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0 - rhs.0)
    }
}

/// Result of a contest from the point of view of one participant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn score(self) -> Score {
        match self {
            Outcome::Win => Score::WIN,
            Outcome::Loss => Score::LOSS,
            Outcome::Tie => Score::DRAW,
        }
    }

    /// The same contest seen from the other participant.
    #[must_use]
    pub fn opposite(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Tie => "tie",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_outcomes() {
        assert_eq!(Outcome::Win.opposite(), Outcome::Loss);
        assert_eq!(Outcome::Loss.opposite(), Outcome::Win);
        assert_eq!(Outcome::Tie.opposite(), Outcome::Tie);
    }

    #[test]
    fn test_outcome_scores() {
        assert_eq!(Outcome::Win.score(), Score::WIN);
        assert_eq!(Outcome::Loss.score(), Score::LOSS);
        assert_eq!(Outcome::Tie.score(), Score::DRAW);
        assert_eq!(Outcome::Tie.to_string(), "tie");
    }
}
