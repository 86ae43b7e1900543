//! Typed errors for ledger rule violations.

use crate::domain::models::household::Capability;

/// Errors raised by domain validation and the balance engine.
///
/// Storage failures travel as `anyhow::Error`; these variants cover the
/// cases a caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Spend of {amount:.2} exceeds remaining allowance of {remaining:.2}")]
    Overspend { amount: f64, remaining: f64 },

    #[error("Unrecognized date: {value}")]
    InvalidDateFormat { value: String },

    #[error("No ledger settings found for household {household_id}")]
    MissingSettings { household_id: String },

    #[error("Unknown transaction kind: {value}")]
    InvalidTransactionKind { value: String },

    #[error("Not permitted to {capability}")]
    NotPermitted { capability: Capability },
}
