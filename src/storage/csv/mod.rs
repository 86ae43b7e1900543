//! CSV file storage backend.
//!
//! Human-readable flat files under one base directory:
//! `transactions.csv`, `settings.csv`, `households.csv`, and
//! `memberships.csv`. Every write goes through a temp file followed by
//! an atomic rename.

pub mod connection;
pub mod household_repository;
pub mod settings_repository;
pub mod transaction_repository;

pub use connection::CsvConnection;
pub use household_repository::HouseholdRepository;
pub use settings_repository::SettingsRepository;
pub use transaction_repository::TransactionRepository;
