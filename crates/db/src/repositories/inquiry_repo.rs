//! Repository for inquiries and the guarded assignment write.

use quotedesk_core::assignment::{normalize_reason, AssignmentError, AssignmentType};
use quotedesk_core::error::CoreError;
use quotedesk_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use crate::error::StoreError;
use crate::models::assignment_history::{AssignmentRecord, ConfirmAssignment};
use crate::models::inquiry::{CreateInquiry, InquiryFilter, InquiryRow};
use crate::repositories::assignment_history_repo::COLUMNS as HISTORY_COLUMNS;

/// Column list for `inquiries` queries.
const COLUMNS: &str = "id, inquiry_number, customer_name, product_category, urgency, \
     assigned_engineer_id, assigned_at, version, created_at, updated_at";

/// Result of [`InquiryRepo::confirm_assignment`].
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentWrite {
    pub inquiry: InquiryRow,
    /// The appended history record, or `None` when the command was a replay
    /// of an assignment that is already in place.
    pub record: Option<AssignmentRecord>,
}

pub struct InquiryRepo;

impl InquiryRepo {
    pub async fn create(pool: &PgPool, input: &CreateInquiry) -> Result<InquiryRow, StoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let category = input.product_category.trim();
        if category.is_empty() {
            return Err(
                CoreError::Validation("product_category must not be blank".to_string()).into(),
            );
        }

        let sql = format!(
            "INSERT INTO inquiries (customer_name, product_category, urgency) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, InquiryRow>(&sql)
            .bind(input.customer_name.trim())
            .bind(category)
            .bind(input.urgency.as_str())
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InquiryRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        sqlx::query_as::<_, InquiryRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List inquiries oldest first, optionally only those with no engineer.
    pub async fn list(pool: &PgPool, filter: &InquiryFilter) -> Result<Vec<InquiryRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM inquiries \
             WHERE ($1 = false OR assigned_engineer_id IS NULL) \
             ORDER BY id"
        );
        sqlx::query_as::<_, InquiryRow>(&sql)
            .bind(filter.unassigned)
            .fetch_all(pool)
            .await
    }

    /// Write an assignment decision, guarded by the inquiry version.
    ///
    /// Check order, all inside one transaction holding the inquiry row lock:
    /// 1. The inquiry must exist.
    /// 2. `Reassign` needs a current engineer other than `engineer_id`.
    ///    `Assign`/`Auto` need an unassigned inquiry, except that a command
    ///    naming the engineer already in place is a replay and succeeds
    ///    without changes. A losing concurrent auto-assignment therefore
    ///    sees `AlreadyAssigned`.
    /// 3. `expected_version` must equal the current version.
    /// 4. The engineer, and the cited rule if any, must exist.
    ///
    /// The inquiry update itself is a compare-and-set on `version`. On
    /// success both engineers' in-flight counts are adjusted and a history
    /// record is appended before commit.
    pub async fn confirm_assignment(
        pool: &PgPool,
        inquiry_id: DbId,
        cmd: &ConfirmAssignment,
    ) -> Result<AssignmentWrite, StoreError> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, InquiryRow>(&select)
            .bind(inquiry_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Inquiry",
                id: inquiry_id,
            })?;

        match (cmd.assignment_type, current.assigned_engineer_id) {
            (AssignmentType::Reassign, None) => {
                return Err(AssignmentError::InvalidReassignment(format!(
                    "inquiry {inquiry_id} has no engineer to reassign from"
                ))
                .into());
            }
            (AssignmentType::Reassign, Some(engineer_id)) if engineer_id == cmd.engineer_id => {
                return Err(AssignmentError::InvalidReassignment(format!(
                    "inquiry {inquiry_id} is already assigned to engineer {engineer_id}"
                ))
                .into());
            }
            (AssignmentType::Assign | AssignmentType::Auto, Some(engineer_id))
                if engineer_id == cmd.engineer_id =>
            {
                return Ok(AssignmentWrite {
                    inquiry: current,
                    record: None,
                });
            }
            (AssignmentType::Assign | AssignmentType::Auto, Some(engineer_id)) => {
                return Err(AssignmentError::AlreadyAssigned {
                    inquiry_id,
                    engineer_id,
                }
                .into());
            }
            _ => {}
        }

        if current.version != cmd.expected_version {
            return Err(version_conflict(inquiry_id, current.version, cmd.expected_version).into());
        }

        let engineer_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM engineer_workloads WHERE engineer_id = $1)",
        )
        .bind(cmd.engineer_id)
        .fetch_one(&mut *tx)
        .await?;
        if !engineer_exists {
            return Err(CoreError::NotFound {
                entity: "Engineer",
                id: cmd.engineer_id,
            }
            .into());
        }

        if let Some(rule_id) = cmd.rule_id {
            let rule_exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM assignment_rules WHERE id = $1)")
                    .bind(rule_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !rule_exists {
                return Err(CoreError::NotFound {
                    entity: "AssignmentRule",
                    id: rule_id,
                }
                .into());
            }
        }

        let update = format!(
            "UPDATE inquiries SET \
                assigned_engineer_id = $3, \
                assigned_at = NOW(), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, InquiryRow>(&update)
            .bind(inquiry_id)
            .bind(cmd.expected_version)
            .bind(cmd.engineer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| version_conflict(inquiry_id, current.version, cmd.expected_version))?;

        let previous = current.assigned_engineer_id;
        if let Some(prev_id) = previous {
            sqlx::query(
                "UPDATE engineer_workloads \
                 SET current_inquiries = GREATEST(current_inquiries - 1, 0), updated_at = NOW() \
                 WHERE engineer_id = $1",
            )
            .bind(prev_id)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query(
            "UPDATE engineer_workloads \
             SET current_inquiries = current_inquiries + 1, \
                 last_assigned_at = NOW(), \
                 updated_at = NOW() \
             WHERE engineer_id = $1",
        )
        .bind(cmd.engineer_id)
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            "INSERT INTO assignment_history \
                (inquiry_id, engineer_id, previous_engineer_id, assignment_type, \
                 reason, rule_id, assigned_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {HISTORY_COLUMNS}"
        );
        let record = sqlx::query_as::<_, AssignmentRecord>(&insert)
            .bind(inquiry_id)
            .bind(cmd.engineer_id)
            .bind(previous)
            .bind(cmd.assignment_type.as_str())
            .bind(normalize_reason(cmd.reason.as_deref()))
            .bind(cmd.rule_id)
            .bind(&cmd.assigned_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            inquiry_id,
            engineer_id = cmd.engineer_id,
            previous_engineer_id = ?previous,
            version = updated.version,
            "Assignment written"
        );

        Ok(AssignmentWrite {
            inquiry: updated,
            record: Some(record),
        })
    }
}

fn version_conflict(inquiry_id: DbId, current: i64, expected: i64) -> CoreError {
    CoreError::Conflict(format!(
        "Inquiry {inquiry_id} is at version {current}, expected {expected}"
    ))
}
