//! Domain-level command types.
//!
//! Commands are plain inputs to the services. They carry the acting
//! user so the services can check capabilities before touching storage.

pub mod transactions {
    use chrono::{DateTime, Utc};

    /// Input for recording a spend against the allowance.
    #[derive(Debug, Clone)]
    pub struct AddSpendCommand {
        pub household_id: String,
        pub user_id: String,
        pub amount: f64,
        pub note: Option<String>,
        /// Backdate override; defaults to the current time.
        pub date: Option<DateTime<Utc>>,
    }

    /// Input for recording pay earned outside the allowance.
    #[derive(Debug, Clone)]
    pub struct AddPayCommand {
        pub household_id: String,
        pub user_id: String,
        pub amount: f64,
        pub note: Option<String>,
        pub date: Option<DateTime<Utc>>,
    }

    /// Input for setting the remaining allowance to an exact target.
    #[derive(Debug, Clone)]
    pub struct ApplyAdjustmentCommand {
        pub household_id: String,
        pub user_id: String,
        pub target: f64,
    }

    /// Input for deleting a transaction by ID.
    #[derive(Debug, Clone)]
    pub struct DeleteTransactionCommand {
        pub household_id: String,
        pub user_id: String,
        pub transaction_id: String,
    }
}

pub mod settings {
    use chrono::{DateTime, Utc};

    /// Input for replacing a household's ledger settings.
    #[derive(Debug, Clone)]
    pub struct UpdateSettingsCommand {
        pub household_id: String,
        pub user_id: String,
        pub tracking_start: DateTime<Utc>,
        pub weekly_allowance: f64,
        pub initial_savings: f64,
    }
}

pub mod households {
    use chrono::{DateTime, Utc};

    use crate::domain::models::Role;

    /// Input for creating a household with its initial settings.
    #[derive(Debug, Clone)]
    pub struct CreateHouseholdCommand {
        pub name: String,
        pub created_by: String,
        pub weekly_allowance: f64,
        /// Accrual start override; defaults to the current time.
        pub tracking_start: Option<DateTime<Utc>>,
    }

    /// Input for adding a member to a household.
    #[derive(Debug, Clone)]
    pub struct InviteMemberCommand {
        pub household_id: String,
        pub invited_by: String,
        pub user_id: String,
        pub role: Role,
    }
}
