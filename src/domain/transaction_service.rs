//! Transaction recording and balance queries.
//!
//! Every mutation runs the same pipeline: capability check, rule
//! validation against derived balances, then a single storage write.
//! `now` is always an explicit argument so callers (and tests) control
//! the clock.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::balance_service::BalanceService;
use crate::domain::commands::transactions::{
    AddPayCommand, AddSpendCommand, ApplyAdjustmentCommand, DeleteTransactionCommand,
};
use crate::domain::errors::LedgerError;
use crate::domain::household_service::HouseholdService;
use crate::domain::import_service::ImportBatch;
use crate::domain::models::{Balances, Capability, LedgerSettings, Transaction, TransactionKind};
use crate::storage::traits::{SettingsStore, TransactionStore};

#[derive(Clone)]
pub struct TransactionService {
    transaction_store: Arc<dyn TransactionStore>,
    settings_store: Arc<dyn SettingsStore>,
    household_service: HouseholdService,
    balance_service: BalanceService,
}

impl TransactionService {
    pub fn new(
        transaction_store: Arc<dyn TransactionStore>,
        settings_store: Arc<dyn SettingsStore>,
        household_service: HouseholdService,
        balance_service: BalanceService,
    ) -> Self {
        Self {
            transaction_store,
            settings_store,
            household_service,
            balance_service,
        }
    }

    /// Current balances for a household as of `now`.
    pub fn balances(&self, household_id: &str, now: DateTime<Utc>) -> Result<Balances> {
        let settings = self.require_settings(household_id)?;
        let transactions = self.transaction_store.list_transactions(household_id)?;
        let balances = self
            .balance_service
            .derive_balances(&settings, &transactions, now)?;
        Ok(balances)
    }

    /// All transactions for a household, most recent first.
    pub fn list_transactions(&self, household_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_store.list_transactions(household_id)
    }

    /// Record a spend, rejecting any amount over the remaining allowance.
    ///
    /// The check always runs against balances as of `now`, even when the
    /// command backdates the transaction itself.
    pub fn add_spend(&self, command: AddSpendCommand, now: DateTime<Utc>) -> Result<Transaction> {
        self.household_service.require_capability(
            &command.user_id,
            &command.household_id,
            Capability::RecordSpend,
        )?;

        let balances = self.balances(&command.household_id, now)?;
        if let Err(err) = self.balance_service.validate_spend(command.amount, &balances) {
            warn!(
                "Rejected spend of {:.2} for household {}: {}",
                command.amount, command.household_id, err
            );
            return Err(err.into());
        }

        let transaction = self.build_transaction(
            command.household_id,
            TransactionKind::Spend,
            command.date.unwrap_or(now),
            command.amount,
            command.note,
            command.user_id,
            now,
        );
        self.transaction_store.insert_transaction(&transaction)?;

        info!(
            "Recorded spend of {:.2} for household {}",
            transaction.amount, transaction.household_id
        );
        Ok(transaction)
    }

    /// Record pay earned outside the allowance. Feeds savings only.
    pub fn add_pay(&self, command: AddPayCommand, now: DateTime<Utc>) -> Result<Transaction> {
        self.household_service.require_capability(
            &command.user_id,
            &command.household_id,
            Capability::RecordPay,
        )?;
        self.require_settings(&command.household_id)?;
        TransactionKind::Pay.validate_amount(command.amount)?;

        let transaction = self.build_transaction(
            command.household_id,
            TransactionKind::Pay,
            command.date.unwrap_or(now),
            command.amount,
            command.note,
            command.user_id,
            now,
        );
        self.transaction_store.insert_transaction(&transaction)?;

        info!(
            "Recorded pay of {:.2} for household {}",
            transaction.amount, transaction.household_id
        );
        Ok(transaction)
    }

    /// Set the remaining allowance to an exact target by appending a
    /// signed adjustment. Parent only.
    pub fn apply_adjustment(
        &self,
        command: ApplyAdjustmentCommand,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        self.household_service.require_capability(
            &command.user_id,
            &command.household_id,
            Capability::ApplyAdjustment,
        )?;

        let balances = self.balances(&command.household_id, now)?;
        let delta = self.balance_service.adjustment_delta(command.target, &balances)?;

        let transaction = self.build_transaction(
            command.household_id,
            TransactionKind::Adjust,
            now,
            delta,
            Some("Adjustment".to_string()),
            command.user_id,
            now,
        );
        self.transaction_store.insert_transaction(&transaction)?;

        info!(
            "Adjusted household {} to target {:.2} (delta {:.2})",
            transaction.household_id, command.target, delta
        );
        Ok(transaction)
    }

    /// Delete a transaction by ID. Parent only.
    /// Returns true if the transaction was found and deleted.
    pub fn delete_transaction(&self, command: DeleteTransactionCommand) -> Result<bool> {
        self.household_service.require_capability(
            &command.user_id,
            &command.household_id,
            Capability::DeleteTransaction,
        )?;

        let deleted = self
            .transaction_store
            .delete_transaction(&command.household_id, &command.transaction_id)?;
        if deleted {
            info!(
                "Deleted transaction {} from household {}",
                command.transaction_id, command.household_id
            );
        }
        Ok(deleted)
    }

    /// Apply a shaped import batch: snapshot settings first (aligned to
    /// a reset boundary), then every shaped record as a transaction.
    ///
    /// Imported spends are a restore of history, not new spending, so
    /// they skip the overspend check.
    pub fn import_batch(
        &self,
        household_id: &str,
        user_id: &str,
        batch: ImportBatch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        self.household_service
            .require_capability(user_id, household_id, Capability::ImportData)?;

        if let Some(draft) = batch.settings {
            let settings = LedgerSettings {
                household_id: household_id.to_string(),
                tracking_start: self
                    .balance_service
                    .clock()
                    .next_boundary(draft.tracking_start),
                weekly_allowance: draft.weekly_allowance,
                initial_savings: draft.initial_savings,
            };
            settings.validate()?;
            self.settings_store.upsert_settings(&settings)?;
            info!("📥 IMPORT: applied snapshot settings for household {}", household_id);
        } else {
            self.require_settings(household_id)?;
        }

        let mut imported = Vec::with_capacity(batch.records.len());
        for (index, draft) in batch.records.into_iter().enumerate() {
            // The whole batch shares one `now`; stamp each record a
            // millisecond apart so same-kind ids stay unique.
            let stamp = now + Duration::milliseconds(index as i64);
            let transaction = self.build_transaction(
                household_id.to_string(),
                draft.kind,
                draft.date,
                draft.amount,
                draft.note,
                user_id.to_string(),
                stamp,
            );
            self.transaction_store.insert_transaction(&transaction)?;
            imported.push(transaction);
        }

        if !batch.skipped.is_empty() {
            warn!(
                "📥 IMPORT: household {} skipped {} records",
                household_id,
                batch.skipped.len()
            );
        }
        info!(
            "📥 IMPORT: inserted {} transactions into household {}",
            imported.len(),
            household_id
        );
        Ok(imported)
    }

    fn require_settings(&self, household_id: &str) -> Result<LedgerSettings> {
        let settings = self
            .settings_store
            .get_settings(household_id)?
            .ok_or_else(|| LedgerError::MissingSettings {
                household_id: household_id.to_string(),
            })?;
        Ok(settings)
    }

    fn build_transaction(
        &self,
        household_id: String,
        kind: TransactionKind,
        date: DateTime<Utc>,
        amount: f64,
        note: Option<String>,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id: Transaction::generate_id(kind, now.timestamp_millis() as u64),
            household_id,
            kind,
            date,
            amount,
            note: note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            created_by,
        }
    }
}
