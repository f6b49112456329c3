//! Action decision table: tier boundaries, first-match-wins ordering,
//! and the unconditional catch-all.

use retention_core::{
    actions::{recommend, Urgency},
    config::ModelConfig,
    features::FeatureVector,
};

fn rules() -> ModelConfig {
    ModelConfig::default_model()
}

fn quiet_vector() -> FeatureVector {
    let mut v = FeatureVector::baseline("acct-test");
    v.future_bookings = 2.0;
    v
}

/// Score tiers map to the expected urgency with no extra conditions.
#[test]
fn tier_boundaries() {
    let m = rules();
    let v = quiet_vector();
    let cases = [
        (0, Urgency::Low),
        (39, Urgency::Low),
        (40, Urgency::Medium),
        (59, Urgency::Medium),
        (60, Urgency::High),
        (79, Urgency::High),
        (80, Urgency::Critical),
        (100, Urgency::Critical),
    ];
    for (score, expected) in cases {
        let rule = recommend(score, &v, &m.action_rules).unwrap();
        assert_eq!(rule.urgency, expected, "score={score}");
    }
}

/// At the critical tier, the inactivity rule outranks zero-bookings even
/// when both conditions hold.
#[test]
fn inactivity_rule_wins_over_zero_bookings() {
    let m = rules();
    let mut v = quiet_vector();
    v.inactivity_days = 25.0;
    v.future_bookings = 0.0;

    let rule = recommend(85, &v, &m.action_rules).unwrap();
    assert_eq!(rule.urgency, Urgency::Critical);
    assert!(
        rule.action.contains("personal outreach"),
        "expected the inactivity action, got '{}'",
        rule.action
    );
}

/// With inactivity under 21 days, zero bookings selects the booking rule.
#[test]
fn zero_bookings_rule_fires_when_inactivity_is_quiet() {
    let m = rules();
    let mut v = quiet_vector();
    v.inactivity_days = 5.0;
    v.future_bookings = 0.0;

    let rule = recommend(85, &v, &m.action_rules).unwrap();
    assert_eq!(rule.action, "Book a session immediately");
}

/// Critical with neither condition falls through to escalation.
#[test]
fn critical_fallback_escalates() {
    let m = rules();
    let rule = recommend(90, &quiet_vector(), &m.action_rules).unwrap();
    assert_eq!(rule.action, "Escalate to a retention specialist");
}

/// High tier: cancellation rate beats low package, both beat the
/// wellness check-in fallback.
#[test]
fn high_tier_condition_ordering() {
    let m = rules();

    let mut cancels = quiet_vector();
    cancels.cancellation_rate = 0.45;
    cancels.remaining_pct = 0.05;
    let rule = recommend(65, &cancels, &m.action_rules).unwrap();
    assert_eq!(rule.action, "Review scheduling flexibility");

    let mut low_package = quiet_vector();
    low_package.remaining_pct = 0.05;
    let rule = recommend(65, &low_package, &m.action_rules).unwrap();
    assert_eq!(rule.action, "Proactive renewal outreach");

    let rule = recommend(65, &quiet_vector(), &m.action_rules).unwrap();
    assert_eq!(rule.action, "Schedule a wellness check-in");
}

/// Boundary values do not trigger strict-inequality conditions:
/// cancellation at exactly 0.3 and package at exactly 10% fall through.
#[test]
fn condition_boundaries_are_strict() {
    let m = rules();
    let mut v = quiet_vector();
    v.cancellation_rate = 0.3;
    v.remaining_pct = 0.10;
    let rule = recommend(65, &v, &m.action_rules).unwrap();
    assert_eq!(rule.action, "Schedule a wellness check-in");
}
