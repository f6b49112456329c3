//! Horizon projector — derives the short/medium/long churn scores from
//! the base log-odds plus a trend-based extrapolation term.

use crate::config::HorizonConfig;
use serde::{Deserialize, Serialize};

/// Integer [0,100] churn scores at the three forecast windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonScores {
    pub short:  u8,
    pub medium: u8,
    pub long:   u8,
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn to_score(log_odds: f64) -> u8 {
    (sigmoid(log_odds) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Project the three horizon scores.
///
/// - medium: the canonical 30-day-equivalent sigmoid score.
/// - short:  damped — near-term alarm needs stronger confirming signals.
/// - long:   a negative trend (declining engagement velocity) amplifies
///           the long horizon; flat or positive trend leaves it at the
///           medium sigmoid.
pub fn project(log_odds: f64, trend: f64, cfg: &HorizonConfig) -> HorizonScores {
    HorizonScores {
        short:  to_score(log_odds - cfg.short_damping),
        medium: to_score(log_odds),
        long:   to_score(log_odds + (-trend).max(0.0) * cfg.trend_gain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HorizonConfig {
        HorizonConfig { short_damping: 0.75, trend_gain: 0.5 }
    }

    #[test]
    fn sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_is_damped_below_medium() {
        let scores = project(0.0, 0.0, &cfg());
        assert_eq!(scores.medium, 50);
        assert!(scores.short < scores.medium);
    }

    #[test]
    fn flat_or_positive_trend_leaves_long_at_medium() {
        for trend in [0.0, 0.5, 3.0] {
            let scores = project(0.4, trend, &cfg());
            assert_eq!(scores.long, scores.medium, "trend={trend}");
        }
    }

    #[test]
    fn negative_trend_amplifies_long() {
        let flat = project(0.0, 0.0, &cfg());
        let declining = project(0.0, -2.0, &cfg());
        assert!(declining.long > flat.long);
        assert_eq!(declining.medium, flat.medium);
    }

    #[test]
    fn extremes_stay_in_range() {
        let hi = project(50.0, -50.0, &cfg());
        let lo = project(-50.0, 0.0, &cfg());
        assert_eq!((hi.short, hi.medium, hi.long), (100, 100, 100));
        assert_eq!((lo.short, lo.medium, lo.long), (0, 0, 0));
    }
}
