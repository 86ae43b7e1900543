//! Domain layer for the allowance ledger.
//!
//! ## Structure
//!
//! - `models/` - transactions, settings, households, derived balances
//! - `reset_clock` - weekly boundary arithmetic in civil time
//! - `balance_service` - the pure fold from log to balances
//! - `household_service` - households, memberships, capability checks
//! - `settings_service` - settings reads and parent-gated updates
//! - `transaction_service` - recording, adjusting, deleting, importing
//! - `import_service` - shaping pasted text into transaction drafts
//! - `export_service` - JSON snapshots and delimited renderings
//! - `commands` - plain inputs to the services

pub mod balance_service;
pub mod commands;
pub mod errors;
pub mod export_service;
pub mod household_service;
pub mod import_service;
pub mod models;
pub mod reset_clock;
pub mod settings_service;
pub mod transaction_service;
