use crate::{EloRating, RatingDifference, Score};

/// Rating difference at which the stronger side is expected to score ten
/// times as often as the weaker side.
const LOGISTIC_SCALE: f64 = 400.0;

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    default_rating: f64,
    k_factor: f64,
    decimals: Option<u32>,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            default_rating: 1000.0,
            k_factor: 20.0,
            decimals: None,
        }
    }

    /// Baseline rating for an individual the first time it is seen in a
    /// group.
    pub fn default_rating(&mut self, default_rating: f64) -> &mut Self {
        assert!(default_rating.is_finite());
        self.default_rating = default_rating;
        self
    }

    /// Maximum rating change of a single contest.
    pub fn k_factor(&mut self, k_factor: f64) -> &mut Self {
        assert!(k_factor >= 0.0 && k_factor.is_finite());
        self.k_factor = k_factor;
        self
    }

    /// Round updated ratings to a fixed number of decimal places. `None`
    /// keeps full precision.
    pub fn decimals(&mut self, decimals: Option<u32>) -> &mut Self {
        self.decimals = decimals;
        self
    }

    pub fn build(&self) -> RatingSystem {
        RatingSystem {
            default_rating: self.default_rating,
            k_factor: self.k_factor,
            decimals: self.decimals,
        }
    }
}

/// Elo update rule shared by all groups of one run.
#[derive(Debug, Clone)]
pub struct RatingSystem {
    default_rating: f64,
    k_factor: f64,
    decimals: Option<u32>,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem::new()
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn new() -> RatingSystem {
        RatingSystem::builder().build()
    }

    pub fn new_rating(&self) -> EloRating {
        EloRating(self.default_rating)
    }

    pub fn default_rating(&self) -> f64 {
        self.default_rating
    }

    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }

    pub fn decimals(&self) -> Option<u32> {
        self.decimals
    }

    /// Expected score of `first` against `second` under the logistic model.
    pub fn expected_score(&self, first: EloRating, second: EloRating) -> Score {
        let diff = f64::from(second - first);
        Score(1.0 / (1.0 + 10f64.powf(diff / LOGISTIC_SCALE)))
    }

    /// Applies the outcome of one contest, where `score` is the actual score
    /// of `first`. The change is zero-sum: whatever `first` gains, `second`
    /// loses.
    pub fn update_ratings(
        &self,
        first: EloRating,
        second: EloRating,
        score: Score,
    ) -> (EloRating, EloRating) {
        let expected = self.expected_score(first, second);
        let delta = RatingDifference(self.k_factor * (score - expected).value());

        let first = first + delta;
        let second = second + -delta;

        match self.decimals {
            Some(decimals) => (first.round_to(decimals), second.round_to(decimals)),
            None => (first, second),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_defaults() {
        let rating_system = RatingSystem::new();
        assert_eq!(rating_system.new_rating(), EloRating(1000.0));
        assert_eq!(rating_system.k_factor(), 20.0);
        assert_eq!(rating_system.decimals(), None);
    }

    #[test]
    fn test_expected_score() {
        let rating_system = RatingSystem::new();
        assert_close(
            rating_system
                .expected_score(EloRating(1000.0), EloRating(1000.0))
                .value(),
            0.5,
        );
        assert_close(
            rating_system
                .expected_score(EloRating(1400.0), EloRating(1000.0))
                .value(),
            10.0 / 11.0,
        );
        let stronger = rating_system.expected_score(EloRating(1100.0), EloRating(1000.0));
        let weaker = rating_system.expected_score(EloRating(1000.0), EloRating(1100.0));
        assert_close(stronger.value() + weaker.value(), 1.0);
    }

    #[test]
    fn test_update_equal_ratings() {
        let rating_system = RatingSystem::builder().k_factor(32.0).build();
        let (a, b) = rating_system.update_ratings(EloRating(1000.0), EloRating(1000.0), Score::WIN);
        assert_close(a.0, 1016.0);
        assert_close(b.0, 984.0);

        let (a, b) = rating_system.update_ratings(EloRating(1000.0), EloRating(1000.0), Score::DRAW);
        assert_close(a.0, 1000.0);
        assert_close(b.0, 1000.0);
    }

    #[test]
    fn test_update_is_zero_sum() {
        let rating_system = RatingSystem::builder().k_factor(32.0).build();
        for (first, second) in [(1000.0, 1000.0), (1250.5, 980.0), (700.0, 1300.0)] {
            for score in [Score::WIN, Score::LOSS, Score::DRAW] {
                let (a, b) = rating_system.update_ratings(EloRating(first), EloRating(second), score);
                assert_close(a.0 - first, -(b.0 - second));
            }
        }
    }

    #[test]
    fn test_tie_pulls_ratings_together() {
        let rating_system = RatingSystem::builder().k_factor(32.0).build();
        let (a, b) = rating_system.update_ratings(EloRating(1100.0), EloRating(1000.0), Score::DRAW);
        assert!(a.0 < 1100.0);
        assert!(b.0 > 1000.0);
    }

    #[test]
    fn test_rounding() {
        let rating_system = RatingSystem::builder()
            .k_factor(20.0)
            .decimals(Some(1))
            .build();
        let (a, b) = rating_system.update_ratings(EloRating(1000.0), EloRating(1050.0), Score::WIN);
        // expected score of the lower side is ~0.4285, so it gains ~11.43
        assert_eq!(a, EloRating(1011.4));
        assert_eq!(b, EloRating(1038.6));
    }

    #[test]
    #[should_panic]
    fn test_negative_k_factor_rejected() {
        RatingSystem::builder().k_factor(-1.0);
    }
}
