//! Model configuration — the weight table, horizon constants, and the
//! action decision table.
//!
//! All of it is plain data: factors are declarative descriptors evaluated
//! uniformly by the scorer, and the action table is an ordered rule list.
//! Nothing here is derived at runtime; weights are hand-calibrated and
//! supplied as configuration, never fitted from data. A `ModelConfig` is
//! injected wherever scoring happens so tests can substitute their own.

use crate::actions::Urgency;
use crate::error::RiskResult;
use crate::features::FeatureKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether a factor argues for or against churn in the explanation.
/// Framing only — the weight sign carries the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Risk,
    Protective,
}

/// How a factor turns its feature value into a log-odds contribution.
///
/// Threshold variants use strict inequality: a value exactly at the
/// threshold contributes zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// Unconditional, rate-like: `weight × value`.
    Identity,
    /// `weight × max(0, value − threshold)`.
    ExcessAbove { threshold: f64 },
    /// `weight × max(0, threshold − value)`.
    DeficitBelow { threshold: f64 },
    /// Boolean trigger: `weight` when the value is exactly zero.
    IsZero,
}

/// A named, weighted rule contributing to or against churn likelihood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factor {
    pub id:         String,
    pub label:      String,
    pub feature:    FeatureKey,
    pub weight:     f64,
    pub activation: Activation,
    pub direction:  Direction,
}

/// The additive log-odds model: a bias term plus a factor list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightTable {
    /// Baseline churn log-odds; sigmoid(bias) ≈ the population base rate.
    pub bias: f64,
    /// Defensive cap on any single factor's |contribution|, so one
    /// runaway day-count cannot saturate the sigmoid alone.
    pub contribution_clamp: f64,
    pub factors: Vec<Factor>,
}

/// Constants for the three forecast windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonConfig {
    /// Subtracted from log-odds for the short horizon; near-term alarm
    /// requires stronger confirming signals.
    pub short_damping: f64,
    /// Multiplies a negative trend into the long-horizon log-odds.
    pub trend_gain: f64,
}

/// A feature predicate guarding an action rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FeaturePredicate {
    Above { feature: FeatureKey, value: f64 },
    Below { feature: FeatureKey, value: f64 },
    IsZero { feature: FeatureKey },
}

/// One row of the action decision table. Rules are evaluated in order;
/// the first rule whose score tier and predicate both hold wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRule {
    pub min_score: u8,
    #[serde(default)]
    pub condition: Option<FeaturePredicate>,
    pub urgency:   Urgency,
    pub action:    String,
}

/// Everything the scoring pipeline needs, bundled for injection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_version:     String,
    pub weight_table:      WeightTable,
    pub horizons:          HorizonConfig,
    pub action_rules:      Vec<ActionRule>,
    pub explanation_limit: usize,
}

impl ModelConfig {
    /// Load a model from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RiskResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The hand-calibrated production model.
    ///
    /// Calibration anchors: sigmoid(-2.2) ≈ 0.10 population base rate;
    /// 25 inactive days + zero bookings + a nearly exhausted package
    /// lands at log-odds 1.45 ≈ probability 0.81 (critical tier).
    pub fn default_model() -> Self {
        use Activation::*;
        use Direction::*;

        let factor = |id: &str, label: &str, feature, weight, activation, direction| Factor {
            id: id.into(),
            label: label.into(),
            feature,
            weight,
            activation,
            direction,
        };

        let factors = vec![
            // Risk factors
            factor(
                "inactivity_excess", "Inactive beyond 14 days",
                FeatureKey::InactivityDays, 0.15, ExcessAbove { threshold: 14.0 }, Risk,
            ),
            factor(
                "no_future_bookings", "No future bookings",
                FeatureKey::FutureBookings, 1.2, IsZero, Risk,
            ),
            factor(
                "package_nearly_exhausted", "Package nearly exhausted",
                FeatureKey::RemainingPct, 4.0, DeficitBelow { threshold: 0.25 }, Risk,
            ),
            factor(
                "cancellation_rate", "High cancellation rate",
                FeatureKey::CancellationRate, 2.5, Identity, Risk,
            ),
            factor(
                "no_shows", "Repeated no-shows",
                FeatureKey::NoShowCount, 0.25, ExcessAbove { threshold: 2.0 }, Risk,
            ),
            factor(
                "depletion_imminent", "Sessions running out",
                FeatureKey::DaysToDepletion, 0.08, DeficitBelow { threshold: 14.0 }, Risk,
            ),
            factor(
                "expiry_imminent", "Package expiring soon",
                FeatureKey::DaysToExpiry, 0.05, DeficitBelow { threshold: 21.0 }, Risk,
            ),
            factor(
                "momentum_declining", "Declining momentum",
                FeatureKey::MomentumVelocity, 1.2, DeficitBelow { threshold: 0.0 }, Risk,
            ),
            factor(
                "contact_lapsed", "No recent contact",
                FeatureKey::DaysSinceContact, 0.03, ExcessAbove { threshold: 30.0 }, Risk,
            ),
            factor(
                "irregular_attendance", "Irregular attendance pattern",
                FeatureKey::IrregularityScore, 0.8, ExcessAbove { threshold: 0.5 }, Risk,
            ),
            // Protective factors (negative weights reduce log-odds)
            factor(
                "steady_burn", "Healthy weekly session usage",
                FeatureKey::WeeklyBurnRate, -0.25, Identity, Protective,
            ),
            factor(
                "tenure", "Long-standing client",
                FeatureKey::TenureMonths, -0.04, ExcessAbove { threshold: 6.0 }, Protective,
            ),
            factor(
                "recent_engagement", "Active in the last week",
                FeatureKey::Sessions7d, -0.15, ExcessAbove { threshold: 2.0 }, Protective,
            ),
            factor(
                "session_history", "Deep session history",
                FeatureKey::TotalSessions, -0.005, ExcessAbove { threshold: 50.0 }, Protective,
            ),
        ];

        let rule = |min_score, condition, urgency, action: &str| ActionRule {
            min_score,
            condition,
            urgency,
            action: action.into(),
        };

        // First match wins. Order within a tier is deliberate: the
        // inactivity rule outranks zero-bookings at the critical tier.
        let action_rules = vec![
            rule(
                80,
                Some(FeaturePredicate::Above { feature: FeatureKey::InactivityDays, value: 21.0 }),
                Urgency::Critical,
                "Immediate personal outreach from the assigned representative",
            ),
            rule(
                80,
                Some(FeaturePredicate::IsZero { feature: FeatureKey::FutureBookings }),
                Urgency::Critical,
                "Book a session immediately",
            ),
            rule(80, None, Urgency::Critical, "Escalate to a retention specialist"),
            rule(
                60,
                Some(FeaturePredicate::Above { feature: FeatureKey::CancellationRate, value: 0.3 }),
                Urgency::High,
                "Review scheduling flexibility",
            ),
            rule(
                60,
                Some(FeaturePredicate::Below { feature: FeatureKey::RemainingPct, value: 0.10 }),
                Urgency::High,
                "Proactive renewal outreach",
            ),
            rule(60, None, Urgency::High, "Schedule a wellness check-in"),
            rule(40, None, Urgency::Medium, "Send a milestone progress update"),
            rule(0, None, Urgency::Low, "No action required"),
        ];

        ModelConfig {
            model_version: "v1".into(),
            weight_table: WeightTable {
                bias: -2.2,
                contribution_clamp: 3.0,
                factors,
            },
            horizons: HorizonConfig {
                short_damping: 0.75,
                trend_gain: 0.5,
            },
            action_rules,
            explanation_limit: 10,
        }
    }
}
