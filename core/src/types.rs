//! Shared primitive types used across the crate.

/// A stable, unique identifier for a tracked account.
pub type AccountId = String;
