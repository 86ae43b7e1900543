//! Storage layer: backend traits and the CSV implementation.

pub mod csv;
pub mod traits;

pub use traits::{HouseholdStore, SettingsStore, TransactionStore};
