//! retention-core — churn risk scoring for tracked client accounts.
//!
//! PIPELINE (fixed, documented, never reordered):
//!   1. Feature normalizer   (features.rs)  — raw map → typed vector
//!   2. Log-odds scorer      (scorer.rs)    — weight table → contributions
//!   3. Horizon projector    (horizon.rs)   — log-odds → 3 scores
//!   4. Risk explainer       (explain.rs)   — top-N ranked contributions
//!   5. Action recommender   (actions.rs)   — decision table → urgency
//!   6. Batch runner         (batch.rs)     — orchestration + persistence
//!
//! RULES:
//!   - Scoring a single account is pure: no I/O, no shared state.
//!   - All model parameters live in an injected ModelConfig.
//!   - Only the store module talks to the database.

pub mod actions;
pub mod batch;
pub mod config;
pub mod error;
pub mod explain;
pub mod features;
pub mod horizon;
pub mod scorer;
pub mod store;
pub mod types;
