//! Domain models shared across services and storage.

pub mod balances;
pub mod household;
pub mod settings;
pub mod transaction;

pub use balances::Balances;
pub use household::{Capability, Household, Membership, Role};
pub use settings::LedgerSettings;
pub use transaction::{Transaction, TransactionIdError, TransactionKind};
