//! Scoring pipeline properties: range, determinism, monotonicity,
//! protective offsets, and explanation ordering.

use retention_core::{
    config::ModelConfig,
    explain::explain,
    features::FeatureVector,
    horizon::project,
    scorer::score,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn model() -> ModelConfig {
    ModelConfig::default_model()
}

fn healthy_vector() -> FeatureVector {
    let mut v = FeatureVector::baseline("acct-test");
    v.future_bookings = 2.0;
    v
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// All three horizon scores are integers in [0,100] across a spread of
/// inputs, including pathological ones.
#[test]
fn scores_stay_in_range() {
    let m = model();
    for inactivity in [0.0, 14.0, 50.0, 400.0] {
        for trend in [-5.0, 0.0, 5.0] {
            let mut v = healthy_vector();
            v.inactivity_days = inactivity;
            v.session_trend = trend;
            let (log_odds, _) = score(&v, &m.weight_table);
            let s = project(log_odds, trend, &m.horizons);
            assert!(s.short <= 100 && s.medium <= 100 && s.long <= 100);
        }
    }
}

/// Scoring twice with identical input yields identical output, including
/// contribution order.
#[test]
fn scoring_is_deterministic() {
    let m = model();
    let mut v = healthy_vector();
    v.inactivity_days = 30.0;
    v.cancellation_rate = 0.35;
    v.remaining_pct = 0.08;

    let (odds_a, contrib_a) = score(&v, &m.weight_table);
    let (odds_b, contrib_b) = score(&v, &m.weight_table);

    assert_eq!(odds_a.to_bits(), odds_b.to_bits());
    assert_eq!(contrib_a, contrib_b);
    assert_eq!(explain(&contrib_a, 10), explain(&contrib_b, 10));
}

/// Holding everything else fixed, more inactivity days past the
/// threshold never decreases the medium score.
#[test]
fn inactivity_is_monotone_on_medium() {
    let m = model();
    let mut previous = 0u8;
    for days in [0.0, 14.0, 15.0, 21.0, 30.0, 60.0] {
        let mut v = healthy_vector();
        v.inactivity_days = days;
        let (log_odds, _) = score(&v, &m.weight_table);
        let medium = project(log_odds, 0.0, &m.horizons).medium;
        assert!(
            medium >= previous,
            "medium dropped from {previous} to {medium} at {days} days"
        );
        previous = medium;
    }
}

/// Burn rate at 2 or more strictly lowers log-odds versus the same
/// vector with burn rate 0.
#[test]
fn burn_rate_is_protective() {
    let m = model();
    let idle = healthy_vector();
    let (odds_idle, _) = score(&idle, &m.weight_table);

    for rate in [2.0, 3.0, 5.0] {
        let mut active = healthy_vector();
        active.weekly_burn_rate = rate;
        let (odds_active, _) = score(&active, &m.weight_table);
        assert!(
            odds_active < odds_idle,
            "burn_rate={rate} did not lower log-odds ({odds_active} vs {odds_idle})"
        );
    }
}

/// An account where no factor fires still scores validly off the bias
/// term alone, near the population base rate.
#[test]
fn bias_only_account_scores_near_base_rate() {
    let m = model();
    let v = healthy_vector();
    let (log_odds, contributions) = score(&v, &m.weight_table);
    assert!(contributions.is_empty());
    let s = project(log_odds, 0.0, &m.horizons);
    assert_eq!(s.medium, 10, "sigmoid(bias) should sit at the ~10% base rate");
    assert!(s.short < s.medium);
}

/// Explanations carry at most 10 entries, sorted by descending |impact|.
#[test]
fn explanation_is_capped_and_sorted() {
    let m = model();
    let mut v = FeatureVector::baseline("acct-test");
    // Fire as many factors as possible at once.
    v.inactivity_days = 40.0;
    v.future_bookings = 0.0;
    v.remaining_pct = 0.02;
    v.cancellation_rate = 0.5;
    v.no_show_count = 6.0;
    v.days_to_depletion = 3.0;
    v.days_to_expiry = 5.0;
    v.momentum_velocity = -2.0;
    v.days_since_contact = 60.0;
    v.irregularity_score = 0.9;
    v.weekly_burn_rate = 1.0;
    v.tenure_months = 24.0;
    v.sessions_7d = 4.0;
    v.total_sessions = 200.0;

    let (_, contributions) = score(&v, &m.weight_table);
    assert!(contributions.len() > 10, "expected every factor to fire");

    let top = explain(&contributions, 10);
    assert_eq!(top.len(), 10);
    for pair in top.windows(2) {
        assert!(
            pair[0].impact.abs() >= pair[1].impact.abs(),
            "not sorted by |impact|: {pair:?}"
        );
    }
}
