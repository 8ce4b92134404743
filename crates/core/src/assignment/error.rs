use crate::types::DbId;

/// Typed, non-fatal outcomes of an assignment decision.
///
/// Every variant is deterministic given the same inputs; callers translate
/// them into user-facing messages and resubmit after the rule set or roster
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("No active assignment rule matches the inquiry's product category")]
    NoMatch,

    #[error("Inquiry {inquiry_id} is already assigned to engineer {engineer_id}")]
    AlreadyAssigned { inquiry_id: DbId, engineer_id: DbId },

    #[error("Invalid reassignment: {0}")]
    InvalidReassignment(String),

    #[error("No engineers available for category '{category}'")]
    NoEngineersAvailable { category: String },

    #[error("Auto-assign disabled for matching rule '{rule_name}'")]
    AutoAssignDisabled { rule_name: String },

    #[error("Engineer {engineer_id} is not in the supplied roster")]
    UnknownEngineer { engineer_id: DbId },
}
