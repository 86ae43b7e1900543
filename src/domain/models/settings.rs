//! Per-household ledger settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::LedgerError;

/// Configuration that drives the weekly accrual for one household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSettings {
    pub household_id: String,
    /// Accrual anchor; normalized to a reset boundary when saved.
    pub tracking_start: DateTime<Utc>,
    /// Amount granted at each weekly reset.
    pub weekly_allowance: f64,
    /// Savings balance at the tracking start.
    pub initial_savings: f64,
}

impl LedgerSettings {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.weekly_allowance.is_finite() || self.weekly_allowance < 0.0 {
            return Err(LedgerError::InvalidAmount {
                reason: format!(
                    "weekly allowance must be a non-negative number, got {}",
                    self.weekly_allowance
                ),
            });
        }
        if !self.initial_savings.is_finite() {
            return Err(LedgerError::InvalidAmount {
                reason: format!(
                    "initial savings must be a finite number, got {}",
                    self.initial_savings
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings(weekly_allowance: f64, initial_savings: f64) -> LedgerSettings {
        LedgerSettings {
            household_id: "household::1702516122000".to_string(),
            tracking_start: Utc.with_ymd_and_hms(2025, 7, 7, 16, 0, 0).unwrap(),
            weekly_allowance,
            initial_savings,
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings(10.0, 0.0).validate().is_ok());
        assert!(settings(0.0, -25.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(settings(-5.0, 0.0).validate().is_err());
        assert!(settings(f64::NAN, 0.0).validate().is_err());
        assert!(settings(10.0, f64::INFINITY).validate().is_err());
    }
}
