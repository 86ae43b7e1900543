//! Balance derivation engine.
//!
//! Balances are never stored. They are recomputed on demand by folding
//! the transaction log over the settings:
//!
//! ```text
//! granted             = elapsed_resets * weekly_allowance
//! allowance_remaining = max(granted + adjustments - spends, 0)
//! savings             = initial_savings + pay - spends
//! ```
//!
//! Pay feeds savings only; it never raises the spendable allowance.

use chrono::{DateTime, Utc};
use log::info;

use crate::domain::errors::LedgerError;
use crate::domain::models::{Balances, LedgerSettings, Transaction, TransactionKind};
use crate::domain::reset_clock::ResetClock;

/// Derives balances from settings and the transaction log.
#[derive(Clone)]
pub struct BalanceService {
    clock: ResetClock,
}

impl BalanceService {
    pub fn new(clock: ResetClock) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &ResetClock {
        &self.clock
    }

    /// Fold the transaction log into balance figures as of `now`.
    ///
    /// The fold is a sum per kind, so transaction order does not matter.
    pub fn derive_balances(
        &self,
        settings: &LedgerSettings,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Result<Balances, LedgerError> {
        settings.validate()?;

        let mut total_spends = 0.0;
        let mut total_adjustments = 0.0;
        let mut total_pay = 0.0;
        for transaction in transactions {
            transaction.kind.validate_amount(transaction.amount)?;
            match transaction.kind {
                TransactionKind::Spend => total_spends += transaction.amount,
                TransactionKind::Adjust => total_adjustments += transaction.amount,
                TransactionKind::Pay => total_pay += transaction.amount,
            }
        }

        let resets = self.clock.elapsed_resets(settings.tracking_start, now);
        let granted = resets as f64 * settings.weekly_allowance;
        let allowance_remaining = (granted + total_adjustments - total_spends).max(0.0);
        let savings = settings.initial_savings + total_pay - total_spends;

        info!(
            "Derived balances for household {}: {} resets, {:.2} remaining, {:.2} savings",
            settings.household_id, resets, allowance_remaining, savings
        );

        Ok(Balances {
            resets,
            granted,
            total_spends,
            total_adjustments,
            total_pay,
            allowance_remaining,
            savings,
        })
    }

    /// Check that a spend fits within the remaining allowance.
    ///
    /// Spending the exact remaining amount is allowed; only a strictly
    /// larger amount is an overspend.
    pub fn validate_spend(&self, amount: f64, balances: &Balances) -> Result<(), LedgerError> {
        TransactionKind::Spend.validate_amount(amount)?;
        if amount > balances.allowance_remaining {
            return Err(LedgerError::Overspend {
                amount,
                remaining: balances.allowance_remaining,
            });
        }
        Ok(())
    }

    /// Signed adjustment amount that moves the allowance to `target`.
    ///
    /// The delta is computed against the unclamped allowance, so a ledger
    /// sitting below zero gets the full correction in one step.
    pub fn adjustment_delta(&self, target: f64, balances: &Balances) -> Result<f64, LedgerError> {
        if !target.is_finite() {
            return Err(LedgerError::InvalidAmount {
                reason: format!("adjustment target must be a finite number, got {}", target),
            });
        }
        let unclamped = balances.granted + balances.total_adjustments - balances.total_spends;
        Ok(target - unclamped)
    }
}

impl Default for BalanceService {
    fn default() -> Self {
        Self::new(ResetClock::default())
    }
}
