//! Domain model for a ledger transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::errors::LedgerError;

/// Kind of ledger entry. Spends draw down both the allowance and the
/// savings figure, pays feed savings only, adjustments are signed
/// corrections to the spendable allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Spend,
    Pay,
    Adjust,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Spend => "spend",
            TransactionKind::Pay => "pay",
            TransactionKind::Adjust => "adjust",
        }
    }

    /// Check an amount against this kind's sign policy.
    ///
    /// Spend and pay amounts are stored as non-negative magnitudes;
    /// adjustments carry their sign. Every kind requires a finite number.
    pub fn validate_amount(&self, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidAmount {
                reason: format!("{} amount must be a finite number, got {}", self, amount),
            });
        }
        match self {
            TransactionKind::Spend | TransactionKind::Pay if amount < 0.0 => {
                Err(LedgerError::InvalidAmount {
                    reason: format!("{} amounts are non-negative magnitudes, got {}", self, amount),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spend" => Ok(TransactionKind::Spend),
            "pay" => Ok(TransactionKind::Pay),
            "adjust" => Ok(TransactionKind::Adjust),
            _ => Err(LedgerError::InvalidTransactionKind {
                value: s.trim().to_string(),
            }),
        }
    }
}

/// A single ledger entry. Immutable once recorded; corrections are made
/// by appending an adjustment, not by editing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub household_id: String,
    /// Serialized as `type` for compatibility with exported snapshots.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_by: String,
}

impl Transaction {
    /// Generate a transaction ID from the kind and a timestamp.
    /// Format: txn::<kind>::<epoch_millis>-<random_suffix>
    /// Example: txn::spend::1625846400123-af3c
    pub fn generate_id(kind: TransactionKind, epoch_millis: u64) -> String {
        format!("txn::{}::{}-{}", kind, epoch_millis, generate_random_suffix(4))
    }

    /// Parse a transaction ID to extract its kind and timestamp.
    pub fn parse_id(id: &str) -> Result<(TransactionKind, u64), TransactionIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "txn" {
            return Err(TransactionIdError::InvalidFormat);
        }
        let kind = parts[1]
            .parse::<TransactionKind>()
            .map_err(|_| TransactionIdError::InvalidKind)?;
        let millis = parts[2]
            .split('-')
            .next()
            .unwrap_or("")
            .parse::<u64>()
            .map_err(|_| TransactionIdError::InvalidTimestamp)?;
        Ok((kind, millis))
    }

    /// Extract the epoch timestamp from this transaction's ID for sorting.
    pub fn extract_timestamp(&self) -> Result<u64, TransactionIdError> {
        Self::parse_id(&self.id).map(|(_, timestamp)| timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransactionIdError {
    #[error("Invalid transaction ID format")]
    InvalidFormat,
    #[error("Invalid kind in transaction ID")]
    InvalidKind,
    #[error("Invalid timestamp in transaction ID")]
    InvalidTimestamp,
}

/// Random hex suffix so two IDs generated in the same millisecond differ.
fn generate_random_suffix(len: usize) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:x}", now % (16_u128.pow(len as u32)))
        .chars()
        .take(len)
        .collect()
}
