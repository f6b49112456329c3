//! Action recommender — maps a medium-horizon score plus specific feature
//! conditions to an urgency tier and a recommended action.
//!
//! The table is configuration (`ModelConfig::action_rules`), evaluated as
//! an ordered set of guarded rules: first match wins.

use crate::config::{ActionRule, FeaturePredicate};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Critical => "CRITICAL",
            Urgency::High     => "HIGH",
            Urgency::Medium   => "MEDIUM",
            Urgency::Low      => "LOW",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn predicate_holds(predicate: &FeaturePredicate, features: &FeatureVector) -> bool {
    match *predicate {
        FeaturePredicate::Above { feature, value } => features.get(feature) > value,
        FeaturePredicate::Below { feature, value } => features.get(feature) < value,
        FeaturePredicate::IsZero { feature }       => features.get(feature) == 0.0,
    }
}

/// Walk the ordered rule list; return the first rule whose tier and
/// predicate both hold. The default table ends in an unconditional LOW
/// rule, so a well-formed table always matches.
pub fn recommend<'a>(
    medium_score: u8,
    features: &FeatureVector,
    rules: &'a [ActionRule],
) -> Option<&'a ActionRule> {
    rules.iter().find(|rule| {
        medium_score >= rule.min_score
            && rule
                .condition
                .as_ref()
                .map_or(true, |p| predicate_holds(p, features))
    })
}
