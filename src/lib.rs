//! Household allowance ledger with weekly accrual.
//!
//! Tracks two buckets per household: a spendable allowance that grows by
//! a fixed amount at every weekly reset (Monday 09:00 in the household's
//! timezone), and a savings balance fed by pay for chores. Balances are
//! never stored; they are derived on demand from the settings and the
//! transaction log, so the log stays the single source of truth.
//!
//! Storage is pluggable behind traits; the bundled backend keeps
//! human-readable CSV files in one directory and writes them atomically.

pub mod domain;
pub mod storage;

pub use domain::balance_service::BalanceService;
pub use domain::errors::LedgerError;
pub use domain::export_service::{ExportService, Snapshot};
pub use domain::household_service::HouseholdService;
pub use domain::import_service::{
    ImportBatch, ImportService, SettingsDraft, SkippedRecord, TransactionDraft,
};
pub use domain::models::{
    Balances, Capability, Household, LedgerSettings, Membership, Role, Transaction,
    TransactionKind,
};
pub use domain::reset_clock::ResetClock;
pub use domain::settings_service::SettingsService;
pub use domain::transaction_service::TransactionService;
pub use storage::csv::CsvConnection;
