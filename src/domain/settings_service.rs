//! Ledger settings reads and updates.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::household_service::HouseholdService;
use crate::domain::models::{Capability, LedgerSettings};
use crate::domain::reset_clock::ResetClock;
use crate::storage::traits::SettingsStore;

#[derive(Clone)]
pub struct SettingsService {
    settings_store: Arc<dyn SettingsStore>,
    household_service: HouseholdService,
    clock: ResetClock,
}

impl SettingsService {
    pub fn new(
        settings_store: Arc<dyn SettingsStore>,
        household_service: HouseholdService,
        clock: ResetClock,
    ) -> Self {
        Self {
            settings_store,
            household_service,
            clock,
        }
    }

    pub fn get_settings(&self, household_id: &str) -> Result<Option<LedgerSettings>> {
        self.settings_store.get_settings(household_id)
    }

    /// Replace a household's settings. Parent only.
    ///
    /// The stored tracking start is always a reset boundary: whatever
    /// instant the command carries gets aligned forward before saving.
    pub fn update_settings(&self, command: UpdateSettingsCommand) -> Result<LedgerSettings> {
        self.household_service.require_capability(
            &command.user_id,
            &command.household_id,
            Capability::EditSettings,
        )?;

        let settings = LedgerSettings {
            household_id: command.household_id,
            tracking_start: self.clock.next_boundary(command.tracking_start),
            weekly_allowance: command.weekly_allowance,
            initial_savings: command.initial_savings,
        };
        settings.validate()?;
        self.settings_store.upsert_settings(&settings)?;

        info!(
            "Updated settings for household {}: weekly allowance {:.2}",
            settings.household_id, settings.weekly_allowance
        );
        Ok(settings)
    }
}
