//! Household lifecycle and membership checks.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::households::{CreateHouseholdCommand, InviteMemberCommand};
use crate::domain::errors::LedgerError;
use crate::domain::models::{Capability, Household, LedgerSettings, Membership, Role};
use crate::domain::reset_clock::ResetClock;
use crate::storage::traits::{HouseholdStore, SettingsStore};

/// Manages households, memberships, and the capability gate the other
/// services call before mutating anything.
#[derive(Clone)]
pub struct HouseholdService {
    household_store: Arc<dyn HouseholdStore>,
    settings_store: Arc<dyn SettingsStore>,
    clock: ResetClock,
}

impl HouseholdService {
    pub fn new(
        household_store: Arc<dyn HouseholdStore>,
        settings_store: Arc<dyn SettingsStore>,
        clock: ResetClock,
    ) -> Self {
        Self {
            household_store,
            settings_store,
            clock,
        }
    }

    /// Create a household with its creator as parent and initial settings.
    ///
    /// The tracking start is aligned forward to the next reset boundary,
    /// so the first allowance grant lands exactly one boundary after it.
    pub fn create_household(
        &self,
        command: CreateHouseholdCommand,
        now: DateTime<Utc>,
    ) -> Result<Household> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Household name cannot be empty"));
        }

        let household = Household {
            id: Household::generate_id(now.timestamp_millis() as u64),
            name: name.to_string(),
            created_by: command.created_by.clone(),
        };
        let settings = LedgerSettings {
            household_id: household.id.clone(),
            tracking_start: self
                .clock
                .next_boundary(command.tracking_start.unwrap_or(now)),
            weekly_allowance: command.weekly_allowance,
            initial_savings: 0.0,
        };
        settings.validate()?;

        self.household_store.insert_household(&household)?;
        self.household_store.upsert_membership(&Membership {
            user_id: command.created_by,
            household_id: household.id.clone(),
            role: Role::Parent,
        })?;
        self.settings_store.upsert_settings(&settings)?;

        info!("Created household {} ({})", household.name, household.id);
        Ok(household)
    }

    /// Add a member, or change an existing member's role.
    pub fn invite_member(&self, command: InviteMemberCommand) -> Result<Membership> {
        self.require_capability(
            &command.invited_by,
            &command.household_id,
            Capability::InviteMember,
        )?;

        let membership = Membership {
            user_id: command.user_id,
            household_id: command.household_id,
            role: command.role,
        };
        self.household_store.upsert_membership(&membership)?;

        info!(
            "Added {} member {} to household {}",
            membership.role, membership.user_id, membership.household_id
        );
        Ok(membership)
    }

    pub fn get_household(&self, household_id: &str) -> Result<Option<Household>> {
        self.household_store.get_household(household_id)
    }

    pub fn membership_for(
        &self,
        user_id: &str,
        household_id: &str,
    ) -> Result<Option<Membership>> {
        self.household_store.membership_for(user_id, household_id)
    }

    /// Check that `user_id` is a member whose role permits `capability`.
    ///
    /// Non-members and members whose role denies the capability both fail
    /// the same way, so callers never learn which from the error.
    pub fn require_capability(
        &self,
        user_id: &str,
        household_id: &str,
        capability: Capability,
    ) -> Result<Membership> {
        match self.household_store.membership_for(user_id, household_id)? {
            Some(membership) if membership.role.permits(capability) => Ok(membership),
            _ => Err(LedgerError::NotPermitted { capability }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::{CsvConnection, HouseholdRepository, SettingsRepository};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HouseholdService) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let service = HouseholdService::new(
            Arc::new(HouseholdRepository::new(connection.clone())),
            Arc::new(SettingsRepository::new(connection)),
            ResetClock::default(),
        );
        (temp_dir, service)
    }

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn create_command(name: &str) -> CreateHouseholdCommand {
        CreateHouseholdCommand {
            name: name.to_string(),
            created_by: "user-parent".to_string(),
            weekly_allowance: 10.0,
            tracking_start: None,
        }
    }

    #[test]
    fn test_create_household_seeds_membership_and_settings() {
        let (_temp, service) = setup();
        // Wednesday 2025-07-09 12:00 UTC.
        let now = utc(2025, 7, 9, 12);

        let household = service.create_household(create_command("The Harts"), now).unwrap();
        assert!(household.id.starts_with("household::"));

        let membership = service
            .membership_for("user-parent", &household.id)
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, Role::Parent);

        // Creator can immediately edit settings.
        assert!(service
            .require_capability("user-parent", &household.id, Capability::EditSettings)
            .is_ok());
    }

    #[test]
    fn test_create_household_aligns_tracking_start() {
        let (_temp, service) = setup();
        let mut command = create_command("The Harts");
        // Wednesday noon; the next boundary is Monday 2025-07-14 09:00 PDT.
        command.tracking_start = Some(utc(2025, 7, 9, 12));

        let household = service
            .create_household(command, utc(2025, 7, 9, 12))
            .unwrap();
        let settings = service
            .settings_store
            .get_settings(&household.id)
            .unwrap()
            .unwrap();
        assert_eq!(settings.tracking_start, utc(2025, 7, 14, 16));
        assert_eq!(settings.initial_savings, 0.0);
    }

    #[test]
    fn test_create_household_rejects_blank_name() {
        let (_temp, service) = setup();
        let err = service
            .create_household(create_command("   "), utc(2025, 7, 9, 12))
            .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_create_household_rejects_negative_allowance() {
        let (temp_dir, service) = setup();
        let mut command = create_command("The Harts");
        command.weekly_allowance = -5.0;

        let err = service
            .create_household(command, utc(2025, 7, 9, 12))
            .unwrap_err();
        assert!(err.downcast_ref::<LedgerError>().is_some());
        // Validation runs before any write, so no files appear.
        assert!(!temp_dir.path().join("households.csv").exists());
        assert!(!temp_dir.path().join("settings.csv").exists());
    }

    #[test]
    fn test_invite_member_requires_parent() {
        let (_temp, service) = setup();
        let household = service
            .create_household(create_command("The Harts"), utc(2025, 7, 9, 12))
            .unwrap();

        // Parent invites a child.
        let membership = service
            .invite_member(InviteMemberCommand {
                household_id: household.id.clone(),
                invited_by: "user-parent".to_string(),
                user_id: "user-kid".to_string(),
                role: Role::Child,
            })
            .unwrap();
        assert_eq!(membership.role, Role::Child);

        // The child cannot invite anyone.
        let err = service
            .invite_member(InviteMemberCommand {
                household_id: household.id.clone(),
                invited_by: "user-kid".to_string(),
                user_id: "user-friend".to_string(),
                role: Role::Child,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::NotPermitted { .. })
        ));

        // Neither can a stranger.
        let err = service
            .invite_member(InviteMemberCommand {
                household_id: household.id,
                invited_by: "user-stranger".to_string(),
                user_id: "user-friend".to_string(),
                role: Role::Parent,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::NotPermitted { .. })
        ));
    }

    #[test]
    fn test_reinvite_updates_role() {
        let (_temp, service) = setup();
        let household = service
            .create_household(create_command("The Harts"), utc(2025, 7, 9, 12))
            .unwrap();

        service
            .invite_member(InviteMemberCommand {
                household_id: household.id.clone(),
                invited_by: "user-parent".to_string(),
                user_id: "user-kid".to_string(),
                role: Role::Child,
            })
            .unwrap();
        service
            .invite_member(InviteMemberCommand {
                household_id: household.id.clone(),
                invited_by: "user-parent".to_string(),
                user_id: "user-kid".to_string(),
                role: Role::Parent,
            })
            .unwrap();

        let membership = service
            .membership_for("user-kid", &household.id)
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, Role::Parent);
        assert_eq!(
            service
                .household_store
                .list_memberships(&household.id)
                .unwrap()
                .len(),
            2
        );
    }
}
