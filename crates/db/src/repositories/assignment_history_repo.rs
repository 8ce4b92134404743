//! Repository for the assignment audit trail.

use quotedesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment_history::AssignmentRecord;

/// Column list for `assignment_history` queries.
pub(crate) const COLUMNS: &str = "id, inquiry_id, engineer_id, previous_engineer_id, \
     assignment_type, reason, rule_id, assigned_by, created_at";

pub struct AssignmentHistoryRepo;

impl AssignmentHistoryRepo {
    /// All assignment records for an inquiry, oldest first.
    pub async fn list_for_inquiry(
        pool: &PgPool,
        inquiry_id: DbId,
    ) -> Result<Vec<AssignmentRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM assignment_history WHERE inquiry_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AssignmentRecord>(&sql)
            .bind(inquiry_id)
            .fetch_all(pool)
            .await
    }
}
