//! Risk explainer — ranks contributions by absolute impact and keeps the
//! top N as the prediction's explanation.

use crate::scorer::Contribution;

/// Pure, deterministic top-N selection: descending |impact|, ties keep
/// evaluation order (stable sort), truncated to `limit`.
pub fn explain(contributions: &[Contribution], limit: usize) -> Vec<Contribution> {
    let mut ranked = contributions.to_vec();
    ranked.sort_by(|a, b| {
        b.impact
            .abs()
            .partial_cmp(&a.impact.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
