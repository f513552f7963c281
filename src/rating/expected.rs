//! Expected-score calculation
//!
//! Standard ELO logistic win probability with an optional home-field
//! adjustment applied to the home rating for the calculation only.

use crate::config::RatingConfig;

/// ELO expected-score calculator
#[derive(Debug, Clone, Copy)]
pub struct ExpectedScoreCalculator {
    home_field_advantage: f64,
}

impl ExpectedScoreCalculator {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            home_field_advantage: config.home_field_advantage,
        }
    }

    /// Probability that a team rated `rating_a` beats one rated `rating_b`
    ///
    /// `expected(a, b) + expected(b, a) == 1.0` for all inputs.
    pub fn expected(&self, rating_a: f64, rating_b: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
    }

    /// Effective (home, away) ratings with home-field advantage applied
    ///
    /// The adjustment is never persisted; it exists only for probability
    /// calculations.
    pub fn effective_ratings(
        &self,
        home_rating: f64,
        away_rating: f64,
        neutral_site: bool,
    ) -> (f64, f64) {
        if neutral_site {
            (home_rating, away_rating)
        } else {
            (home_rating + self.home_field_advantage, away_rating)
        }
    }

    /// Win probability for the home team, home-field rules applied
    pub fn home_win_probability(
        &self,
        home_rating: f64,
        away_rating: f64,
        neutral_site: bool,
    ) -> f64 {
        let (home_eff, away_eff) = self.effective_ratings(home_rating, away_rating, neutral_site);
        self.expected(home_eff, away_eff)
    }

    /// Rounded (home, away) win percentages summing to 100
    pub fn win_percentages(
        &self,
        home_rating: f64,
        away_rating: f64,
        neutral_site: bool,
    ) -> (u8, u8) {
        let home = self.home_win_probability(home_rating, away_rating, neutral_site);
        let home_pct = (home * 100.0).round() as u8;
        (home_pct, 100 - home_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calculator() -> ExpectedScoreCalculator {
        ExpectedScoreCalculator::new(&RatingConfig::default())
    }

    #[test]
    fn test_equal_ratings_are_even() {
        let calc = calculator();
        assert!((calc.expected(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_higher_rating_favored() {
        let calc = calculator();
        assert!(calc.expected(1600.0, 1500.0) > 0.5);
        assert!(calc.expected(1800.0, 1200.0) > 0.9);
        assert!(calc.expected(1200.0, 1800.0) < 0.1);
    }

    #[test]
    fn test_home_field_advantage_for_equal_teams() {
        // 1500 hosts 1500: effective home rating 1565
        let calc = calculator();
        let prob = calc.home_win_probability(1500.0, 1500.0, false);
        assert!((prob - 0.592).abs() < 0.001);
    }

    #[test]
    fn test_neutral_site_skips_home_field() {
        let calc = calculator();
        let prob = calc.home_win_probability(1500.0, 1500.0, true);
        assert!((prob - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_win_percentages_sum_to_100() {
        let calc = calculator();
        let (home, away) = calc.win_percentages(1650.0, 1480.0, false);
        assert_eq!(home + away, 100);
        assert!(home > 50);
    }

    proptest! {
        #[test]
        fn prop_expected_scores_complement(
            a in 0.0_f64..3000.0,
            b in 0.0_f64..3000.0,
        ) {
            let calc = calculator();
            let sum = calc.expected(a, b) + calc.expected(b, a);
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_expected_in_unit_interval(
            a in 0.0_f64..3000.0,
            b in 0.0_f64..3000.0,
        ) {
            let calc = calculator();
            let e = calc.expected(a, b);
            prop_assert!((0.0..=1.0).contains(&e));
        }
    }
}
