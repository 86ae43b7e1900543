//! CSV-backed settings storage.
//!
//! All households' settings live in one `settings.csv`, keyed by
//! household ID. Writes rewrite the whole file through a temp file and
//! an atomic rename.

use anyhow::Result;
use log::info;
use std::collections::HashMap;
use std::fs;

use crate::domain::models::LedgerSettings;
use crate::storage::csv::connection::CsvConnection;
use crate::storage::traits::SettingsStore;

#[derive(Clone)]
pub struct SettingsRepository {
    connection: CsvConnection,
}

impl SettingsRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<HashMap<String, LedgerSettings>> {
        let path = self.connection.settings_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut all = HashMap::new();
        for result in reader.deserialize() {
            let settings: LedgerSettings = result?;
            all.insert(settings.household_id.clone(), settings);
        }
        Ok(all)
    }

    fn write_all(&self, all: &HashMap<String, LedgerSettings>) -> Result<()> {
        let path = self.connection.settings_path();
        let temp_path = path.with_extension("tmp");

        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            let mut rows: Vec<&LedgerSettings> = all.values().collect();
            rows.sort_by(|a, b| a.household_id.cmp(&b.household_id));
            for settings in rows {
                writer.serialize(settings)?;
            }
            writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl SettingsStore for SettingsRepository {
    fn get_settings(&self, household_id: &str) -> Result<Option<LedgerSettings>> {
        let mut all = self.read_all()?;
        Ok(all.remove(household_id))
    }

    fn upsert_settings(&self, settings: &LedgerSettings) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(settings.household_id.clone(), settings.clone());
        self.write_all(&all)?;
        info!(
            "Saved ledger settings for household {}",
            settings.household_id
        );
        Ok(())
    }
}
