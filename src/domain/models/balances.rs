//! Derived balance figures for a household.

use serde::Serialize;

/// Snapshot of the two money buckets at a point in time.
///
/// Always derived from settings plus the transaction log; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balances {
    /// Number of weekly resets elapsed since the tracking start.
    pub resets: u32,
    /// Total allowance granted across those resets.
    pub granted: f64,
    pub total_spends: f64,
    pub total_adjustments: f64,
    pub total_pay: f64,
    /// Spendable allowance, clamped at zero.
    pub allowance_remaining: f64,
    /// Savings balance; may go negative.
    pub savings: f64,
}
