//! Models for the assignment audit trail.

use quotedesk_core::assignment::AssignmentType;
use quotedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assignment_history` table, appended on every
/// successful assignment write.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRecord {
    pub id: DbId,
    pub inquiry_id: DbId,
    pub engineer_id: DbId,
    pub previous_engineer_id: Option<DbId>,
    /// One of `assign`, `reassign`, `auto`.
    pub assignment_type: String,
    pub reason: Option<String>,
    pub rule_id: Option<DbId>,
    pub assigned_by: Option<String>,
    pub created_at: Timestamp,
}

/// Command for the guarded assignment write.
///
/// `expected_version` is the inquiry version the caller based its decision
/// on; the write is refused if the row moved on since.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmAssignment {
    pub engineer_id: DbId,
    pub expected_version: i64,
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub rule_id: Option<DbId>,
    #[serde(default)]
    pub assigned_by: Option<String>,
}
