//! CSV-backed household and membership storage.
//!
//! Households and memberships live in separate files (`households.csv`
//! and `memberships.csv`) sharing the same temp-file-and-rename write
//! path as the other repositories.

use anyhow::{anyhow, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::domain::models::{Household, Membership};
use crate::storage::csv::connection::CsvConnection;
use crate::storage::traits::HouseholdStore;

#[derive(Clone)]
pub struct HouseholdRepository {
    connection: CsvConnection,
}

impl HouseholdRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_households(&self) -> Result<Vec<Household>> {
        read_rows(&self.connection.households_path())
    }

    fn write_households(&self, households: &[Household]) -> Result<()> {
        write_rows(&self.connection.households_path(), households)
    }

    fn read_memberships(&self) -> Result<Vec<Membership>> {
        read_rows(&self.connection.memberships_path())
    }

    fn write_memberships(&self, memberships: &[Membership]) -> Result<()> {
        write_rows(&self.connection.memberships_path(), memberships)
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    {
        let mut writer = csv::Writer::from_path(&temp_path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    // Atomic move from temp to final file
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl HouseholdStore for HouseholdRepository {
    fn insert_household(&self, household: &Household) -> Result<()> {
        let mut households = self.read_households()?;
        if households.iter().any(|existing| existing.id == household.id) {
            return Err(anyhow!("Household {} already exists", household.id));
        }
        households.push(household.clone());
        self.write_households(&households)?;
        info!("Stored household {} ({})", household.name, household.id);
        Ok(())
    }

    fn get_household(&self, household_id: &str) -> Result<Option<Household>> {
        Ok(self
            .read_households()?
            .into_iter()
            .find(|household| household.id == household_id))
    }

    fn upsert_membership(&self, membership: &Membership) -> Result<()> {
        let mut memberships = self.read_memberships()?;
        match memberships.iter_mut().find(|existing| {
            existing.user_id == membership.user_id
                && existing.household_id == membership.household_id
        }) {
            Some(existing) => *existing = membership.clone(),
            None => memberships.push(membership.clone()),
        }
        self.write_memberships(&memberships)?;
        info!(
            "Saved {} membership for {} in household {}",
            membership.role, membership.user_id, membership.household_id
        );
        Ok(())
    }

    fn membership_for(&self, user_id: &str, household_id: &str) -> Result<Option<Membership>> {
        Ok(self.read_memberships()?.into_iter().find(|membership| {
            membership.user_id == user_id && membership.household_id == household_id
        }))
    }

    fn list_memberships(&self, household_id: &str) -> Result<Vec<Membership>> {
        Ok(self
            .read_memberships()?
            .into_iter()
            .filter(|membership| membership.household_id == household_id)
            .collect())
    }
}
