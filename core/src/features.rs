//! Feature normalization — raw per-account feature maps → typed vectors.
//!
//! The feature-engineering pipeline (external) writes a flat JSON map of
//! named numeric metrics per account. Before scoring, that map is turned
//! into a fully populated `FeatureVector`: absent keys take a documented
//! default, wrong-typed values fail with `InvalidFeature`. The scorer
//! never handles "missing" as a runtime case.

use crate::error::{RiskError, RiskResult};
use crate::types::AccountId;
use serde::{Deserialize, Serialize};

/// Day-count sentinel meaning "far away / not a concern".
pub const FAR_AWAY_DAYS: f64 = 999.0;

/// Every metric the model can reference, by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    InactivityDays,
    Sessions7d,
    Sessions30d,
    SessionTrend,
    MomentumVelocity,
    RemainingPct,
    DaysToExpiry,
    DaysToDepletion,
    CancellationRate,
    NoShowCount,
    DaysSinceContact,
    IrregularityScore,
    WeeklyBurnRate,
    TotalSessions,
    TenureMonths,
    FutureBookings,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 16] = [
        FeatureKey::InactivityDays,
        FeatureKey::Sessions7d,
        FeatureKey::Sessions30d,
        FeatureKey::SessionTrend,
        FeatureKey::MomentumVelocity,
        FeatureKey::RemainingPct,
        FeatureKey::DaysToExpiry,
        FeatureKey::DaysToDepletion,
        FeatureKey::CancellationRate,
        FeatureKey::NoShowCount,
        FeatureKey::DaysSinceContact,
        FeatureKey::IrregularityScore,
        FeatureKey::WeeklyBurnRate,
        FeatureKey::TotalSessions,
        FeatureKey::TenureMonths,
        FeatureKey::FutureBookings,
    ];

    /// Key as it appears in the raw feature map.
    pub fn wire_key(self) -> &'static str {
        match self {
            FeatureKey::InactivityDays    => "inactivity_days",
            FeatureKey::Sessions7d        => "sessions_7d",
            FeatureKey::Sessions30d       => "sessions_30d",
            FeatureKey::SessionTrend      => "session_trend",
            FeatureKey::MomentumVelocity  => "momentum_velocity",
            FeatureKey::RemainingPct      => "remaining_pct",
            FeatureKey::DaysToExpiry      => "days_to_expiry",
            FeatureKey::DaysToDepletion   => "days_to_depletion",
            FeatureKey::CancellationRate  => "cancellation_rate",
            FeatureKey::NoShowCount       => "no_show_count",
            FeatureKey::DaysSinceContact  => "days_since_contact",
            FeatureKey::IrregularityScore => "irregularity_score",
            FeatureKey::WeeklyBurnRate    => "weekly_burn_rate",
            FeatureKey::TotalSessions     => "total_sessions",
            FeatureKey::TenureMonths      => "tenure_months",
            FeatureKey::FutureBookings    => "future_bookings",
        }
    }

    /// Default applied when the key is absent from the raw map.
    ///
    /// Counts and rates default to 0; remaining package to "full";
    /// expiry/depletion day-counts to a far-away sentinel so a missing
    /// value never reads as imminent.
    pub fn default_value(self) -> f64 {
        match self {
            FeatureKey::RemainingPct    => 1.0,
            FeatureKey::DaysToExpiry    => FAR_AWAY_DAYS,
            FeatureKey::DaysToDepletion => FAR_AWAY_DAYS,
            _                           => 0.0,
        }
    }
}

/// Fully populated per-account feature record. Every field is a concrete
/// number by the time scoring sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub account_id:         AccountId,
    pub inactivity_days:    f64,
    pub sessions_7d:        f64,
    pub sessions_30d:       f64,
    pub session_trend:      f64,
    pub momentum_velocity:  f64,
    pub remaining_pct:      f64,
    pub days_to_expiry:     f64,
    pub days_to_depletion:  f64,
    pub cancellation_rate:  f64,
    pub no_show_count:      f64,
    pub days_since_contact: f64,
    pub irregularity_score: f64,
    pub weekly_burn_rate:   f64,
    pub total_sessions:     f64,
    pub tenure_months:      f64,
    pub future_bookings:    f64,
}

impl FeatureVector {
    pub fn get(&self, key: FeatureKey) -> f64 {
        match key {
            FeatureKey::InactivityDays    => self.inactivity_days,
            FeatureKey::Sessions7d        => self.sessions_7d,
            FeatureKey::Sessions30d       => self.sessions_30d,
            FeatureKey::SessionTrend      => self.session_trend,
            FeatureKey::MomentumVelocity  => self.momentum_velocity,
            FeatureKey::RemainingPct      => self.remaining_pct,
            FeatureKey::DaysToExpiry      => self.days_to_expiry,
            FeatureKey::DaysToDepletion   => self.days_to_depletion,
            FeatureKey::CancellationRate  => self.cancellation_rate,
            FeatureKey::NoShowCount       => self.no_show_count,
            FeatureKey::DaysSinceContact  => self.days_since_contact,
            FeatureKey::IrregularityScore => self.irregularity_score,
            FeatureKey::WeeklyBurnRate    => self.weekly_burn_rate,
            FeatureKey::TotalSessions     => self.total_sessions,
            FeatureKey::TenureMonths      => self.tenure_months,
            FeatureKey::FutureBookings    => self.future_bookings,
        }
    }

    /// An all-default vector. Used by tests and as the base for builders.
    pub fn baseline(account_id: impl Into<AccountId>) -> Self {
        let mut v = FeatureVector {
            account_id:         account_id.into(),
            inactivity_days:    0.0,
            sessions_7d:        0.0,
            sessions_30d:       0.0,
            session_trend:      0.0,
            momentum_velocity:  0.0,
            remaining_pct:      0.0,
            days_to_expiry:     0.0,
            days_to_depletion:  0.0,
            cancellation_rate:  0.0,
            no_show_count:      0.0,
            days_since_contact: 0.0,
            irregularity_score: 0.0,
            weekly_burn_rate:   0.0,
            total_sessions:     0.0,
            tenure_months:      0.0,
            future_bookings:    0.0,
        };
        for key in FeatureKey::ALL {
            v.set(key, key.default_value());
        }
        v
    }

    fn set(&mut self, key: FeatureKey, value: f64) {
        match key {
            FeatureKey::InactivityDays    => self.inactivity_days = value,
            FeatureKey::Sessions7d        => self.sessions_7d = value,
            FeatureKey::Sessions30d       => self.sessions_30d = value,
            FeatureKey::SessionTrend      => self.session_trend = value,
            FeatureKey::MomentumVelocity  => self.momentum_velocity = value,
            FeatureKey::RemainingPct      => self.remaining_pct = value,
            FeatureKey::DaysToExpiry      => self.days_to_expiry = value,
            FeatureKey::DaysToDepletion   => self.days_to_depletion = value,
            FeatureKey::CancellationRate  => self.cancellation_rate = value,
            FeatureKey::NoShowCount       => self.no_show_count = value,
            FeatureKey::DaysSinceContact  => self.days_since_contact = value,
            FeatureKey::IrregularityScore => self.irregularity_score = value,
            FeatureKey::WeeklyBurnRate    => self.weekly_burn_rate = value,
            FeatureKey::TotalSessions     => self.total_sessions = value,
            FeatureKey::TenureMonths      => self.tenure_months = value,
            FeatureKey::FutureBookings    => self.future_bookings = value,
        }
    }
}

/// Build a `FeatureVector` from a raw JSON feature map.
///
/// Absent or null keys take `FeatureKey::default_value`. A present value
/// of the wrong type (e.g. the string "N/A") fails with `InvalidFeature`
/// naming the key; the batch runner skips that account and continues.
pub fn normalize(
    account_id: &str,
    raw: &serde_json::Map<String, serde_json::Value>,
) -> RiskResult<FeatureVector> {
    let mut vector = FeatureVector::baseline(account_id);
    for key in FeatureKey::ALL {
        let value = match raw.get(key.wire_key()) {
            None | Some(serde_json::Value::Null) => key.default_value(),
            Some(serde_json::Value::Number(n)) => {
                n.as_f64().unwrap_or_else(|| key.default_value())
            }
            Some(other) => {
                return Err(RiskError::InvalidFeature {
                    key:   key.wire_key().to_string(),
                    found: json_type_name(other).to_string(),
                })
            }
        };
        vector.set(key, value);
    }
    Ok(vector)
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null       => "null",
        serde_json::Value::Bool(_)    => "a boolean",
        serde_json::Value::Number(_)  => "a number",
        serde_json::Value::String(_)  => "a string",
        serde_json::Value::Array(_)   => "an array",
        serde_json::Value::Object(_)  => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_keys_take_defaults() {
        let raw = serde_json::Map::new();
        let v = normalize("acct-1", &raw).unwrap();
        assert_eq!(v.inactivity_days, 0.0);
        assert_eq!(v.remaining_pct, 1.0);
        assert_eq!(v.days_to_expiry, FAR_AWAY_DAYS);
        assert_eq!(v.days_to_depletion, FAR_AWAY_DAYS);
    }

    #[test]
    fn wrong_typed_value_names_the_key() {
        let mut raw = serde_json::Map::new();
        raw.insert("cancellation_rate".into(), json!("N/A"));
        let err = normalize("acct-1", &raw).unwrap_err();
        match err {
            RiskError::InvalidFeature { key, found } => {
                assert_eq!(key, "cancellation_rate");
                assert_eq!(found, "a string");
            }
            other => panic!("expected InvalidFeature, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut raw = serde_json::Map::new();
        raw.insert("some_future_metric".into(), json!("whatever"));
        raw.insert("inactivity_days".into(), json!(12));
        let v = normalize("acct-1", &raw).unwrap();
        assert_eq!(v.inactivity_days, 12.0);
    }
}
