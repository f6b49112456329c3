//! Log-odds scorer — evaluates every factor against a normalized feature
//! vector and accumulates the additive churn log-odds.
//!
//! The scorer itself carries no business conditionals: each factor's
//! activation variant decides how its feature value becomes a
//! contribution, and the scorer applies them uniformly.

use crate::config::{Activation, WeightTable};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// One factor's signed addition to the log-odds total. Positive means
/// more likely to churn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub label:  String,
    pub impact: f64,
}

/// Evaluate the weight table against one account's features.
///
/// Returns the accumulated log-odds (starting from the bias term) and a
/// contribution per factor that fired, in factor order. An account where
/// no factor fires still yields a valid result from the bias alone.
pub fn score(features: &FeatureVector, table: &WeightTable) -> (f64, Vec<Contribution>) {
    let mut log_odds = table.bias;
    let mut contributions = Vec::new();

    for factor in &table.factors {
        let value = features.get(factor.feature);
        let raw = match factor.activation {
            Activation::Identity => factor.weight * value,
            Activation::ExcessAbove { threshold } => {
                factor.weight * (value - threshold).max(0.0)
            }
            Activation::DeficitBelow { threshold } => {
                factor.weight * (threshold - value).max(0.0)
            }
            Activation::IsZero => {
                if value == 0.0 { factor.weight } else { 0.0 }
            }
        };

        // One runaway day-count must not saturate the sigmoid alone.
        let impact = raw.clamp(-table.contribution_clamp, table.contribution_clamp);

        if impact != 0.0 {
            log_odds += impact;
            contributions.push(Contribution {
                label: factor.label.clone(),
                impact,
            });
        }
    }

    (log_odds, contributions)
}
