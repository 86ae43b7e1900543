//! # Storage Traits
//!
//! Abstractions over the persistence backend. The domain services hold
//! these as trait objects so the CSV backend can be swapped out (or
//! faked) without touching domain logic.

use anyhow::Result;

use crate::domain::models::{Household, LedgerSettings, Membership, Transaction};

/// Storage for per-household ledger settings.
pub trait SettingsStore: Send + Sync {
    /// Get the settings for a household, if any exist.
    fn get_settings(&self, household_id: &str) -> Result<Option<LedgerSettings>>;

    /// Insert or replace the settings for a household.
    fn upsert_settings(&self, settings: &LedgerSettings) -> Result<()>;
}

/// Storage for the append-style transaction log.
pub trait TransactionStore: Send + Sync {
    /// Insert a new transaction.
    fn insert_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Delete a transaction by ID within a household.
    /// Returns true if the transaction was found and deleted, false otherwise.
    fn delete_transaction(&self, household_id: &str, transaction_id: &str) -> Result<bool>;

    /// List all transactions for a household, most recent first.
    fn list_transactions(&self, household_id: &str) -> Result<Vec<Transaction>>;
}

/// Storage for households and their memberships.
pub trait HouseholdStore: Send + Sync {
    /// Insert a new household. Fails if the ID already exists.
    fn insert_household(&self, household: &Household) -> Result<()>;

    /// Get a household by ID, if it exists.
    fn get_household(&self, household_id: &str) -> Result<Option<Household>>;

    /// Insert or replace a membership for a user within a household.
    fn upsert_membership(&self, membership: &Membership) -> Result<()>;

    /// Get a user's membership in a household, if any.
    fn membership_for(&self, user_id: &str, household_id: &str) -> Result<Option<Membership>>;

    /// List all memberships of a household.
    fn list_memberships(&self, household_id: &str) -> Result<Vec<Membership>>;
}
