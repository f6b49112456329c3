//! Batch runner — iterates every tracked account through the scoring
//! pipeline and persists the results.
//!
//! This is the only component that writes predictions or interventions.
//! A malformed feature row is logged and skipped; it never aborts the
//! batch. Persistence is a bulk upsert keyed by account_id, retried once
//! with backoff, and idempotent: re-running with unchanged inputs rewrites
//! identical rows and creates no duplicate interventions.

use crate::{
    actions::{recommend, Urgency},
    config::ModelConfig,
    error::{RiskError, RiskResult},
    explain::explain,
    features::normalize,
    horizon::{project, HorizonScores},
    scorer::{score, Contribution},
    store::{FeatureRow, RiskStore},
    types::AccountId,
};
use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const RETRY_BACKOFF: std::time::Duration = std::time::Duration::from_millis(250);

/// Output per account per run. Created fresh every batch; upserted over
/// the prior prediction keyed by account_id, never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub account_id:           AccountId,
    pub scores:               HorizonScores,
    pub top_factors:          Vec<Contribution>,
    pub feature_snapshot:     serde_json::Value,
    pub urgency:              Urgency,
    pub recommended_action:   String,
    pub revenue_at_risk:      f64,
    pub projected_churn_date: DateTime<Utc>,
    pub computed_at:          DateTime<Utc>,
}

impl Prediction {
    /// The structured breakdown blob persisted alongside the scores: the
    /// raw feature snapshot plus the ranked top contributions.
    pub fn factor_breakdown(&self) -> RiskResult<serde_json::Value> {
        Ok(serde_json::json!({
            "features":    self.feature_snapshot,
            "top_factors": serde_json::to_value(&self.top_factors)?,
        }))
    }
}

/// Actionable alert record, created only for CRITICAL-tier predictions.
/// Consumed and resolved by an external workflow.
#[derive(Debug, Clone, Serialize)]
pub struct Intervention {
    pub intervention_id: String,
    pub account_id:      AccountId,
    pub urgency:         Urgency,
    pub action_text:     String,
    pub context:         InterventionContext,
    pub status:          String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionContext {
    pub score:             u8,
    pub top_factor_labels: Vec<String>,
    pub revenue_at_risk:   f64,
}

impl Intervention {
    fn for_prediction(prediction: &Prediction) -> Self {
        Intervention {
            intervention_id: uuid::Uuid::new_v4().to_string(),
            account_id:      prediction.account_id.clone(),
            urgency:         prediction.urgency,
            action_text:     prediction.recommended_action.clone(),
            context: InterventionContext {
                score: prediction.scores.medium,
                top_factor_labels: prediction
                    .top_factors
                    .iter()
                    .map(|c| c.label.clone())
                    .collect(),
                revenue_at_risk: prediction.revenue_at_risk,
            },
            status: "pending".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub account_id: AccountId,
    pub message:    String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub critical: usize,
    pub high:     usize,
    pub medium:   usize,
    pub low:      usize,
}

impl TierDistribution {
    fn tally<I: IntoIterator<Item = Urgency>>(tiers: I) -> Self {
        let mut d = TierDistribution::default();
        for tier in tiers {
            match tier {
                Urgency::Critical => d.critical += 1,
                Urgency::High     => d.high += 1,
                Urgency::Medium   => d.medium += 1,
                Urgency::Low      => d.low += 1,
            }
        }
        d
    }
}

/// What a batch run reports back to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub success:                bool,
    pub processed:              usize,
    pub errors:                 Vec<BatchError>,
    pub distribution:           TierDistribution,
    pub critical_interventions: Vec<Intervention>,
}

/// Score one account end to end: normalize → score → project → explain
/// → recommend → assemble. Pure apart from the injected clock.
pub fn score_account(
    row: &FeatureRow,
    config: &ModelConfig,
    now: DateTime<Utc>,
) -> RiskResult<Prediction> {
    let raw = row.features.as_object().ok_or_else(|| RiskError::MalformedFeatureRow {
        account_id: row.account_id.clone(),
        detail: format!(
            "features column holds {}, not a JSON object",
            crate::features::json_type_name(&row.features)
        ),
    })?;

    let features = normalize(&row.account_id, raw)?;
    let (log_odds, contributions) = score(&features, &config.weight_table);
    let scores = project(log_odds, features.session_trend, &config.horizons);
    let top_factors = explain(&contributions, config.explanation_limit);

    let rule = recommend(scores.medium, &features, &config.action_rules)
        .ok_or_else(|| anyhow!("action table has no matching rule for score {}", scores.medium))?;

    Ok(Prediction {
        account_id:           row.account_id.clone(),
        scores,
        top_factors,
        feature_snapshot:     row.features.clone(),
        urgency:              rule.urgency,
        recommended_action:   rule.action.clone(),
        revenue_at_risk:      row.package_value,
        projected_churn_date: now + Duration::days(projected_churn_offset_days(scores.medium)),
        computed_at:          now,
    })
}

/// Deterministic date window per medium-score tier.
fn projected_churn_offset_days(medium: u8) -> i64 {
    match medium {
        80..=100 => 7,
        60..=79  => 21,
        40..=59  => 45,
        _        => 90,
    }
}

pub struct BatchRunner<'a> {
    config: ModelConfig,
    store:  &'a RiskStore,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: ModelConfig, store: &'a RiskStore) -> Self {
        Self { config, store }
    }

    /// Run one full batch at the current wall clock.
    pub fn run(&self) -> RiskResult<BatchSummary> {
        self.run_at(Utc::now())
    }

    /// Run one full batch with an injected clock (tests pin this for
    /// byte-identical re-runs).
    pub fn run_at(&self, now: DateTime<Utc>) -> RiskResult<BatchSummary> {
        let rows = self.store.all_feature_rows()?;
        if rows.is_empty() {
            return Err(RiskError::MissingFeatureInput);
        }

        let mut predictions: Vec<Prediction> = Vec::with_capacity(rows.len());
        let mut errors: Vec<BatchError> = Vec::new();

        for row in &rows {
            match score_account(row, &self.config, now) {
                Ok(prediction) => {
                    log::debug!(
                        "scored {}: medium={} urgency={}",
                        prediction.account_id,
                        prediction.scores.medium,
                        prediction.urgency,
                    );
                    predictions.push(prediction);
                }
                Err(err) => {
                    log::warn!("skipping account {}: {err}", row.account_id);
                    errors.push(BatchError {
                        account_id: row.account_id.clone(),
                        message:    err.to_string(),
                    });
                }
            }
        }

        self.persist_predictions(&predictions)?;

        let mut created = Vec::new();
        let created_at = now.to_rfc3339();
        for prediction in predictions.iter().filter(|p| p.urgency == Urgency::Critical) {
            let intervention = Intervention::for_prediction(prediction);
            if self.persist_intervention(&intervention, &created_at)? {
                log::info!(
                    "intervention created for {} (score={}, revenue_at_risk={:.2})",
                    intervention.account_id,
                    intervention.context.score,
                    intervention.context.revenue_at_risk,
                );
                created.push(intervention);
            }
        }

        let distribution = TierDistribution::tally(predictions.iter().map(|p| p.urgency));
        log::info!(
            "batch complete: processed={} skipped={} critical={} high={} medium={} low={}",
            predictions.len(),
            errors.len(),
            distribution.critical,
            distribution.high,
            distribution.medium,
            distribution.low,
        );

        Ok(BatchSummary {
            success:                !predictions.is_empty(),
            processed:              predictions.len(),
            errors,
            distribution,
            critical_interventions: created,
        })
    }

    fn persist_intervention(&self, intervention: &Intervention, created_at: &str) -> RiskResult<bool> {
        match self.store.upsert_intervention(intervention, created_at) {
            Ok(created) => Ok(created),
            Err(first) => {
                log::warn!(
                    "intervention upsert for {} failed, retrying once: {first}",
                    intervention.account_id
                );
                std::thread::sleep(RETRY_BACKOFF);
                self.store
                    .upsert_intervention(intervention, created_at)
                    .map_err(|err| match err {
                        RiskError::Database(source) => RiskError::Persistence {
                            context: format!("intervention upsert for {}", intervention.account_id),
                            source,
                        },
                        other => other,
                    })
            }
        }
    }

    fn persist_predictions(&self, predictions: &[Prediction]) -> RiskResult<()> {
        if let Err(first) = self.store.upsert_predictions(predictions) {
            log::warn!("prediction upsert failed, retrying once: {first}");
            std::thread::sleep(RETRY_BACKOFF);
            self.store.upsert_predictions(predictions).map_err(|err| match err {
                RiskError::Database(source) => RiskError::Persistence {
                    context: "prediction bulk upsert".into(),
                    source,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}
