use std::ops::{Add, Neg, Sub};

/// Number representing dominance, such that the difference between two
/// ratings can be used to predict the expected score of a contest. Higher is
/// better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct EloRating(pub f64);

impl From<EloRating> for f64 {
    #[inline]
    fn from(EloRating(rating): EloRating) -> f64 {
        rating
    }
}

impl From<f64> for EloRating {
    #[inline]
    fn from(rating: f64) -> EloRating {
        EloRating(rating)
    }
}

impl EloRating {
    /// Rounds half away from zero to the given number of decimal places.
    #[must_use]
    pub fn round_to(self, decimals: u32) -> EloRating {
        let factor = 10f64.powi(decimals as i32);
        EloRating((self.0 * factor).round() / factor)
    }
}

impl Sub<EloRating> for EloRating {
    type Output = RatingDifference;

    #[inline]
    fn sub(self, rhs: EloRating) -> RatingDifference {
        RatingDifference(self.0 - rhs.0)
    }
}

impl Add<RatingDifference> for EloRating {
    type Output = EloRating;

    #[inline]
    fn add(self, RatingDifference(difference): RatingDifference) -> EloRating {
        EloRating(self.0 + difference)
    }
}

/// A difference between two ratings.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct RatingDifference(pub f64);

impl From<RatingDifference> for f64 {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> f64 {
        difference
    }
}

impl From<f64> for RatingDifference {
    #[inline]
    fn from(difference: f64) -> RatingDifference {
        RatingDifference(difference)
    }
}

impl Neg for RatingDifference {
    type Output = RatingDifference;

    #[inline]
    fn neg(self) -> RatingDifference {
        RatingDifference(-self.0)
    }
}
