//! score-runner: headless churn-scoring batch runner.
//!
//! Usage:
//!   score-runner --db accounts.db
//!   score-runner --db accounts.db --model model.json --json
//!   score-runner --db demo.db --seed-demo

use anyhow::Result;
use retention_core::{
    batch::BatchRunner,
    config::ModelConfig,
    error::RiskError,
    store::{FeatureRow, RiskStore},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let model_path = flag_value(&args, "--model");
    let as_json = args.iter().any(|a| a == "--json");
    let seed_demo = args.iter().any(|a| a == "--seed-demo");

    let store = RiskStore::open(db)?;
    store.migrate()?;

    if seed_demo {
        seed_demo_accounts(&store)?;
        log::info!("seeded demo accounts into {db}");
    }

    let config = match model_path {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default_model(),
    };

    let runner = BatchRunner::new(config, &store);
    let summary = match runner.run() {
        Ok(summary) => summary,
        Err(RiskError::MissingFeatureInput) => {
            eprintln!("success: false — no feature rows available to score");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== RUN SUMMARY ===");
    println!("  db:            {db}");
    println!("  accounts:      {}", store.feature_row_count()?);
    println!("  processed:     {}", summary.processed);
    println!("  skipped:       {}", summary.errors.len());
    println!("  critical:      {}", summary.distribution.critical);
    println!("  high:          {}", summary.distribution.high);
    println!("  medium:        {}", summary.distribution.medium);
    println!("  low:           {}", summary.distribution.low);
    println!("  interventions: {} new", summary.critical_interventions.len());

    if !summary.errors.is_empty() {
        println!();
        println!("=== SKIPPED ACCOUNTS ===");
        for err in &summary.errors {
            println!("  {} | {}", err.account_id, err.message);
        }
    }

    if !summary.critical_interventions.is_empty() {
        println!();
        println!("=== NEW CRITICAL INTERVENTIONS ===");
        for iv in &summary.critical_interventions {
            println!(
                "  {} | score={} | ${:.0} at risk | {}",
                iv.account_id, iv.context.score, iv.context.revenue_at_risk, iv.action_text
            );
        }
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// A few representative accounts so the binary is runnable against an
/// empty database.
fn seed_demo_accounts(store: &RiskStore) -> Result<()> {
    let rows = [
        (
            "acct-001",
            "Dana Whitfield",
            "rep-ahmed",
            1800.0,
            serde_json::json!({
                "inactivity_days": 2, "sessions_7d": 3, "sessions_30d": 11,
                "future_bookings": 4, "cancellation_rate": 0.05,
                "weekly_burn_rate": 2.5, "tenure_months": 18,
                "remaining_pct": 0.6, "total_sessions": 140
            }),
        ),
        (
            "acct-002",
            "Miguel Torres",
            "rep-claire",
            950.0,
            serde_json::json!({
                "inactivity_days": 25, "sessions_7d": 0, "sessions_30d": 1,
                "future_bookings": 0, "remaining_pct": 0.05,
                "cancellation_rate": 0.4, "session_trend": -1.5
            }),
        ),
        (
            "acct-003",
            "Priya Raman",
            "rep-ahmed",
            1200.0,
            serde_json::json!({
                "inactivity_days": 9, "sessions_7d": 1, "sessions_30d": 6,
                "future_bookings": 1, "cancellation_rate": 0.2,
                "remaining_pct": 0.3, "tenure_months": 4
            }),
        ),
    ];

    for (account_id, name, rep, package_value, features) in rows {
        store.upsert_account_features(&FeatureRow {
            account_id:    account_id.into(),
            display_name:  name.into(),
            assigned_rep:  rep.into(),
            package_value,
            features,
        })?;
    }
    Ok(())
}
