//! Export rendering: JSON snapshots and delimited transaction logs.
//!
//! Both renderings round-trip through the import shaping, so a family
//! can move a ledger between machines with copy and paste.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{LedgerSettings, Transaction};
use crate::storage::traits::{SettingsStore, TransactionStore};

/// Full portable copy of one household's ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub exported_at: DateTime<Utc>,
    pub settings: Option<LedgerSettings>,
    pub transactions: Vec<Transaction>,
}

#[derive(Clone)]
pub struct ExportService {
    settings_store: Arc<dyn SettingsStore>,
    transaction_store: Arc<dyn TransactionStore>,
}

impl ExportService {
    pub fn new(
        settings_store: Arc<dyn SettingsStore>,
        transaction_store: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            settings_store,
            transaction_store,
        }
    }

    /// Gather a household's settings and full log, most recent first.
    pub fn snapshot(&self, household_id: &str, now: DateTime<Utc>) -> Result<Snapshot> {
        let settings = self.settings_store.get_settings(household_id)?;
        let transactions = self.transaction_store.list_transactions(household_id)?;
        Ok(Snapshot {
            exported_at: now,
            settings,
            transactions,
        })
    }

    /// Render a snapshot as pretty-printed JSON.
    pub fn snapshot_json(&self, household_id: &str, now: DateTime<Utc>) -> Result<String> {
        let snapshot = self.snapshot(household_id, now)?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        info!(
            "📄 EXPORT: rendered snapshot of {} transactions for household {}",
            snapshot.transactions.len(),
            household_id
        );
        Ok(json)
    }

    /// Write a JSON snapshot to disk, creating parent directories.
    pub fn write_snapshot<P: AsRef<Path>>(
        &self,
        household_id: &str,
        now: DateTime<Utc>,
        path: P,
    ) -> Result<()> {
        let json = self.snapshot_json(household_id, now)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        info!(
            "📁 EXPORT: wrote snapshot for household {} to {}",
            household_id,
            path.display()
        );
        Ok(())
    }

    /// Render the transaction log as delimited text with a header row,
    /// in the shape the import side accepts.
    pub fn transactions_csv(&self, household_id: &str) -> Result<String> {
        let transactions = self.transaction_store.list_transactions(household_id)?;

        let mut bytes = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut bytes);
            writer.write_record(["type", "date", "amount", "note"])?;
            for transaction in &transactions {
                let date = transaction.date.to_rfc3339();
                let amount = transaction.amount.to_string();
                writer.write_record([
                    transaction.kind.as_str(),
                    date.as_str(),
                    amount.as_str(),
                    transaction.note.as_deref().unwrap_or(""),
                ])?;
            }
            writer.flush()?;
        }

        info!(
            "📄 EXPORT: rendered {} transactions as delimited text for household {}",
            transactions.len(),
            household_id
        );
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import_service::ImportService;
    use crate::domain::models::TransactionKind;
    use crate::storage::csv::{CsvConnection, SettingsRepository, TransactionRepository};
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct TestStack {
        temp_dir: TempDir,
        settings_store: Arc<SettingsRepository>,
        transaction_store: Arc<TransactionRepository>,
        export_service: ExportService,
    }

    fn setup() -> TestStack {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path().join("data")).unwrap();
        let settings_store = Arc::new(SettingsRepository::new(connection.clone()));
        let transaction_store = Arc::new(TransactionRepository::new(connection));
        let export_service = ExportService::new(settings_store.clone(), transaction_store.clone());
        TestStack {
            temp_dir,
            settings_store,
            transaction_store,
            export_service,
        }
    }

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn seed(stack: &TestStack) {
        use crate::storage::traits::{SettingsStore, TransactionStore};

        stack
            .settings_store
            .upsert_settings(&LedgerSettings {
                household_id: "household::1".to_string(),
                tracking_start: utc(2025, 7, 7, 16),
                weekly_allowance: 10.0,
                initial_savings: 5.0,
            })
            .unwrap();
        let spend = Transaction {
            id: Transaction::generate_id(TransactionKind::Spend, 1),
            household_id: "household::1".to_string(),
            kind: TransactionKind::Spend,
            date: utc(2025, 7, 8, 12),
            amount: 4.0,
            note: Some("snacks, two of them".to_string()),
            created_by: "user-kid".to_string(),
        };
        let pay = Transaction {
            id: Transaction::generate_id(TransactionKind::Pay, 2),
            household_id: "household::1".to_string(),
            kind: TransactionKind::Pay,
            date: utc(2025, 7, 9, 12),
            amount: 2.5,
            note: None,
            created_by: "user-kid".to_string(),
        };
        stack.transaction_store.insert_transaction(&spend).unwrap();
        stack.transaction_store.insert_transaction(&pay).unwrap();
    }

    #[test]
    fn test_snapshot_json_round_trips_through_import() {
        let stack = setup();
        seed(&stack);

        let json = stack
            .export_service
            .snapshot_json("household::1", utc(2025, 7, 10, 9))
            .unwrap();
        let batch = ImportService::new().parse(&json).unwrap();

        assert!(batch.skipped.is_empty());
        let settings = batch.settings.unwrap();
        assert_eq!(settings.tracking_start, utc(2025, 7, 7, 16));
        assert_eq!(settings.weekly_allowance, 10.0);
        assert_eq!(settings.initial_savings, 5.0);

        assert_eq!(batch.records.len(), 2);
        let total: f64 = batch.records.iter().map(|record| record.amount).sum();
        assert_eq!(total, 6.5);
        // Notes with commas survive the trip.
        assert!(batch
            .records
            .iter()
            .any(|record| record.note.as_deref() == Some("snacks, two of them")));
    }

    #[test]
    fn test_transactions_csv_round_trips_through_import() {
        let stack = setup();
        seed(&stack);

        let text = stack
            .export_service
            .transactions_csv("household::1")
            .unwrap();
        assert!(text.starts_with("type,date,amount,note"));

        let batch = ImportService::new().parse(&text).unwrap();
        assert!(batch.skipped.is_empty());
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].kind, TransactionKind::Pay);
        assert_eq!(batch.records[0].date, utc(2025, 7, 9, 12));
        assert_eq!(batch.records[1].amount, 4.0);
    }

    #[test]
    fn test_write_snapshot_creates_directories() {
        let stack = setup();
        seed(&stack);

        let path = stack
            .temp_dir
            .path()
            .join("exports")
            .join("household-1.json");
        stack
            .export_service
            .write_snapshot("household::1", utc(2025, 7, 10, 9), &path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("household::1"));
        assert!(written.contains("\"exported_at\""));
    }

    #[test]
    fn test_snapshot_of_unknown_household_is_empty() {
        let stack = setup();
        let snapshot = stack
            .export_service
            .snapshot("household::nowhere", utc(2025, 7, 10, 9))
            .unwrap();
        assert!(snapshot.settings.is_none());
        assert!(snapshot.transactions.is_empty());
    }
}
