use super::RiskStore;
use crate::batch::Intervention;
use crate::error::RiskResult;
use rusqlite::{params, OptionalExtension};

impl RiskStore {
    // ── Interventions ──────────────────────────────────────────

    /// Upsert keyed by account_id. Returns true when a new record was
    /// created. Re-runs refresh urgency/action/context but keep the
    /// original id, created_at, and status — an intervention the external
    /// workflow already picked up is never reset.
    pub fn upsert_intervention(
        &self,
        intervention: &Intervention,
        created_at: &str,
    ) -> RiskResult<bool> {
        let existed: bool = self
            .conn()
            .query_row(
                "SELECT 1 FROM intervention WHERE account_id = ?1",
                params![intervention.account_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        self.conn().execute(
            "INSERT INTO intervention (
                account_id, intervention_id, urgency, action_text,
                context, status, created_at
            ) VALUES (?1,?2,?3,?4,?5,?6,?7)
            ON CONFLICT(account_id) DO UPDATE SET
                urgency     = excluded.urgency,
                action_text = excluded.action_text,
                context     = excluded.context",
            params![
                intervention.account_id,
                intervention.intervention_id,
                intervention.urgency.as_str(),
                intervention.action_text,
                serde_json::to_string(&intervention.context)?,
                intervention.status,
                created_at,
            ],
        )?;
        Ok(!existed)
    }

    pub fn pending_interventions(&self) -> RiskResult<Vec<InterventionRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT account_id, intervention_id, urgency, action_text,
                    context, status, created_at
             FROM intervention
             WHERE status = 'pending'
             ORDER BY account_id ASC",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok((
                    InterventionRecord {
                        account_id:      row.get(0)?,
                        intervention_id: row.get(1)?,
                        urgency:         row.get(2)?,
                        action_text:     row.get(3)?,
                        context:         serde_json::Value::Null,
                        status:          row.get(5)?,
                        created_at:      row.get(6)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        records
            .into_iter()
            .map(|(mut record, context_text)| {
                record.context = serde_json::from_str(&context_text)?;
                Ok(record)
            })
            .collect()
    }

    pub fn intervention_count(&self) -> RiskResult<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM intervention", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

/// An intervention as persisted, read back for tooling and tests.
#[derive(Debug, Clone)]
pub struct InterventionRecord {
    pub account_id:      String,
    pub intervention_id: String,
    pub urgency:         String,
    pub action_text:     String,
    pub context:         serde_json::Value,
    pub status:          String,
    pub created_at:      String,
}
