//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database. The batch runner and the
//! runner binary call store methods — they never execute SQL directly.

use crate::error::RiskResult;
use crate::types::AccountId;
use rusqlite::{params, Connection};

mod intervention;
mod prediction;

pub use intervention::InterventionRecord;
pub use prediction::PredictionRecord;

pub struct RiskStore {
    conn: Connection,
}

impl RiskStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> RiskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RiskResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RiskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ── Feature rows (read-side boundary) ──────────────────────

    /// Seed or refresh one account's feature row. In production the
    /// feature-engineering pipeline owns this table; the store exposes a
    /// writer for tooling and tests.
    pub fn upsert_account_features(&self, row: &FeatureRow) -> RiskResult<()> {
        self.conn.execute(
            "INSERT INTO account_features
                (account_id, display_name, assigned_rep, package_value, features)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(account_id) DO UPDATE SET
                display_name  = excluded.display_name,
                assigned_rep  = excluded.assigned_rep,
                package_value = excluded.package_value,
                features      = excluded.features",
            params![
                row.account_id,
                row.display_name,
                row.assigned_rep,
                row.package_value,
                row.features.to_string(),
            ],
        )?;
        Ok(())
    }

    /// All feature rows, ordered by account id for a stable batch order.
    pub fn all_feature_rows(&self) -> RiskResult<Vec<FeatureRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_id, display_name, assigned_rep, package_value, features
             FROM account_features
             ORDER BY account_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let features_text: String = row.get(4)?;
                Ok((
                    FeatureRow {
                        account_id:    row.get(0)?,
                        display_name:  row.get(1)?,
                        assigned_rep:  row.get(2)?,
                        package_value: row.get(3)?,
                        features:      serde_json::Value::Null,
                    },
                    features_text,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // The external pipeline owns this table, so corrupt text is a
        // reachable input. An unparseable map is that one account's
        // problem, surfaced at scoring time — never a batch abort.
        Ok(rows
            .into_iter()
            .map(|(mut row, text)| {
                row.features = serde_json::from_str(&text)
                    .unwrap_or(serde_json::Value::String(text));
                row
            })
            .collect())
    }

    pub fn feature_row_count(&self) -> RiskResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM account_features", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

/// One account's raw inputs as read from the feature store: identifying
/// fields, the external package-value lookup, and the flat feature map.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub account_id:    AccountId,
    pub display_name:  String,
    pub assigned_rep:  String,
    pub package_value: f64,
    pub features:      serde_json::Value,
}
