//! Households, memberships, and the role capability model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A household groups members and owns a single ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub created_by: String,
}

impl Household {
    /// Generate a household ID from a timestamp.
    /// Format: household::<epoch_millis>
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("household::{}", epoch_millis)
    }
}

/// Actions a member may need permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RecordSpend,
    RecordPay,
    ApplyAdjustment,
    DeleteTransaction,
    EditSettings,
    InviteMember,
    ImportData,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::RecordSpend => "record spending",
            Capability::RecordPay => "record pay",
            Capability::ApplyAdjustment => "apply adjustments",
            Capability::DeleteTransaction => "delete transactions",
            Capability::EditSettings => "edit settings",
            Capability::InviteMember => "invite members",
            Capability::ImportData => "import data",
        };
        f.write_str(name)
    }
}

/// Role of a member within a household.
///
/// Parents hold every capability. Children can record their own spending
/// and pay but cannot rewrite history or change the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl Role {
    pub fn permits(&self, capability: Capability) -> bool {
        match self {
            Role::Parent => true,
            Role::Child => matches!(capability, Capability::RecordSpend | Capability::RecordPay),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => f.write_str("parent"),
            Role::Child => f.write_str("child"),
        }
    }
}

/// Links a user to a household with a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: String,
    pub household_id: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_household_id_format() {
        assert_eq!(
            Household::generate_id(1702516122000),
            "household::1702516122000"
        );
    }

    #[test]
    fn test_parent_permits_everything() {
        let capabilities = [
            Capability::RecordSpend,
            Capability::RecordPay,
            Capability::ApplyAdjustment,
            Capability::DeleteTransaction,
            Capability::EditSettings,
            Capability::InviteMember,
            Capability::ImportData,
        ];
        for capability in capabilities {
            assert!(Role::Parent.permits(capability), "parent denied {}", capability);
        }
    }

    #[test]
    fn test_child_permits_only_recording() {
        assert!(Role::Child.permits(Capability::RecordSpend));
        assert!(Role::Child.permits(Capability::RecordPay));
        assert!(!Role::Child.permits(Capability::ApplyAdjustment));
        assert!(!Role::Child.permits(Capability::DeleteTransaction));
        assert!(!Role::Child.permits(Capability::EditSettings));
        assert!(!Role::Child.permits(Capability::InviteMember));
        assert!(!Role::Child.permits(Capability::ImportData));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"parent\"");
        assert_eq!(serde_json::to_string(&Role::Child).unwrap(), "\"child\"");
    }
}
