//! CSV-backed transaction storage.
//!
//! The full log for every household lives in one `transactions.csv`,
//! kept chronological on disk. Each write rewrites the file through a
//! temp file and an atomic rename, so a crash mid-write leaves the
//! previous file intact.

use anyhow::Result;
use log::{info, warn};
use std::fs;

use crate::domain::models::Transaction;
use crate::storage::csv::connection::CsvConnection;
use crate::storage::traits::TransactionStore;

#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Transaction>> {
        let path = self.connection.transactions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut transactions = Vec::new();
        for result in reader.deserialize() {
            let transaction: Transaction = result?;
            transactions.push(transaction);
        }
        Ok(transactions)
    }

    fn write_all(&self, transactions: &[Transaction]) -> Result<()> {
        let path = self.connection.transactions_path();
        let temp_path = path.with_extension("tmp");

        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            for transaction in transactions {
                writer.serialize(transaction)?;
            }
            writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl TransactionStore for TransactionRepository {
    fn insert_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_all()?;
        transactions.push(transaction.clone());
        // Chronological on disk
        transactions.sort_by(|a, b| a.date.cmp(&b.date));
        self.write_all(&transactions)?;
        info!("Stored transaction {}", transaction.id);
        Ok(())
    }

    fn delete_transaction(&self, household_id: &str, transaction_id: &str) -> Result<bool> {
        let mut transactions = self.read_all()?;
        let before = transactions.len();
        transactions.retain(|transaction| {
            !(transaction.household_id == household_id && transaction.id == transaction_id)
        });

        if transactions.len() == before {
            warn!("Transaction not found for deletion: {}", transaction_id);
            return Ok(false);
        }

        self.write_all(&transactions)?;
        info!("Deleted transaction {}", transaction_id);
        Ok(true)
    }

    fn list_transactions(&self, household_id: &str) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .read_all()?
            .into_iter()
            .filter(|transaction| transaction.household_id == household_id)
            .collect();
        // Most recent first
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }
}
