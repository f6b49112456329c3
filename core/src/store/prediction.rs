use super::RiskStore;
use crate::batch::Prediction;
use crate::error::RiskResult;
use rusqlite::{params, OptionalExtension};

impl RiskStore {
    // ── Predictions ────────────────────────────────────────────

    /// Bulk upsert, one transaction, keyed by account_id. Idempotent:
    /// re-running with unchanged inputs rewrites identical rows.
    pub fn upsert_predictions(&self, predictions: &[Prediction]) -> RiskResult<()> {
        let tx = self.conn().unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO prediction (
                    account_id, score_short, score_medium, score_long,
                    urgency, recommended_action, factor_breakdown,
                    revenue_at_risk, projected_churn_date, computed_at
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
                ON CONFLICT(account_id) DO UPDATE SET
                    score_short          = excluded.score_short,
                    score_medium         = excluded.score_medium,
                    score_long           = excluded.score_long,
                    urgency              = excluded.urgency,
                    recommended_action   = excluded.recommended_action,
                    factor_breakdown     = excluded.factor_breakdown,
                    revenue_at_risk      = excluded.revenue_at_risk,
                    projected_churn_date = excluded.projected_churn_date,
                    computed_at          = excluded.computed_at",
            )?;
            for p in predictions {
                stmt.execute(params![
                    p.account_id,
                    p.scores.short as i64,
                    p.scores.medium as i64,
                    p.scores.long as i64,
                    p.urgency.as_str(),
                    p.recommended_action,
                    p.factor_breakdown()?.to_string(),
                    p.revenue_at_risk,
                    p.projected_churn_date.to_rfc3339(),
                    p.computed_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn prediction(&self, account_id: &str) -> RiskResult<Option<PredictionRecord>> {
        let record = self
            .conn()
            .query_row(
                "SELECT account_id, score_short, score_medium, score_long,
                        urgency, recommended_action, factor_breakdown,
                        revenue_at_risk, projected_churn_date, computed_at
                 FROM prediction WHERE account_id = ?1",
                params![account_id],
                map_prediction_row,
            )
            .optional()?;

        record.map(parse_breakdown).transpose()
    }

    pub fn all_predictions(&self) -> RiskResult<Vec<PredictionRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT account_id, score_short, score_medium, score_long,
                    urgency, recommended_action, factor_breakdown,
                    revenue_at_risk, projected_churn_date, computed_at
             FROM prediction
             ORDER BY account_id ASC",
        )?;
        let records = stmt
            .query_map([], map_prediction_row)?
            .collect::<Result<Vec<_>, _>>()?;
        records.into_iter().map(parse_breakdown).collect()
    }

    pub fn prediction_count(&self) -> RiskResult<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM prediction", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

fn map_prediction_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PredictionRecord> {
    Ok(PredictionRecord {
        account_id:           row.get(0)?,
        score_short:          row.get(1)?,
        score_medium:         row.get(2)?,
        score_long:           row.get(3)?,
        urgency:              row.get(4)?,
        recommended_action:   row.get(5)?,
        factor_breakdown:     serde_json::Value::String(row.get(6)?),
        revenue_at_risk:      row.get(7)?,
        projected_churn_date: row.get(8)?,
        computed_at:          row.get(9)?,
    })
}

fn parse_breakdown(mut record: PredictionRecord) -> RiskResult<PredictionRecord> {
    if let serde_json::Value::String(text) = &record.factor_breakdown {
        record.factor_breakdown = serde_json::from_str(text)?;
    }
    Ok(record)
}

/// A prediction as persisted, read back for tooling and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub account_id:           String,
    pub score_short:          i64,
    pub score_medium:         i64,
    pub score_long:           i64,
    pub urgency:              String,
    pub recommended_action:   String,
    pub factor_breakdown:     serde_json::Value,
    pub revenue_at_risk:      f64,
    pub projected_churn_date: String,
    pub computed_at:          String,
}
