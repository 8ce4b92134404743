//! Repository for engineer workload records.

use quotedesk_core::assignment::EngineerWorkload;
use quotedesk_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::error::StoreError;
use crate::models::engineer::{EngineerFilter, EngineerWorkloadRow, UpsertEngineerWorkload};

/// Column list for `engineer_workloads` queries.
const COLUMNS: &str = "engineer_id, engineer_name, skill_categories, skill_level, \
     current_inquiries, completed_today, completed_this_week, completed_this_month, \
     is_available, last_assigned_at, created_at, updated_at";

/// Upsert result; `created` is true when the row was inserted.
#[derive(FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    row: EngineerWorkloadRow,
    created: bool,
}

pub struct EngineerRepo;

impl EngineerRepo {
    /// List engineer workloads ordered by engineer id.
    pub async fn list(
        pool: &PgPool,
        filter: &EngineerFilter,
    ) -> Result<Vec<EngineerWorkloadRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM engineer_workloads \
             WHERE ($1::TEXT IS NULL OR $1 = ANY(skill_categories)) \
               AND ($2 = false OR is_available) \
             ORDER BY engineer_id"
        );
        sqlx::query_as::<_, EngineerWorkloadRow>(&sql)
            .bind(filter.category.as_deref().map(str::trim))
            .bind(filter.available_only)
            .fetch_all(pool)
            .await
    }

    /// The full roster, as handed to the resolver.
    pub async fn roster(pool: &PgPool) -> Result<Vec<EngineerWorkload>, sqlx::Error> {
        let rows = Self::list(pool, &EngineerFilter::default()).await?;
        Ok(rows.iter().map(EngineerWorkloadRow::to_workload).collect())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        engineer_id: DbId,
    ) -> Result<Option<EngineerWorkloadRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM engineer_workloads WHERE engineer_id = $1");
        sqlx::query_as::<_, EngineerWorkloadRow>(&sql)
            .bind(engineer_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace an engineer's record.
    ///
    /// Assignment-maintained fields (`last_assigned_at`, and
    /// `current_inquiries` when omitted) survive a replace. Returns the
    /// stored row and whether it was newly created.
    pub async fn upsert(
        pool: &PgPool,
        engineer_id: DbId,
        input: &UpsertEngineerWorkload,
    ) -> Result<(EngineerWorkloadRow, bool), StoreError> {
        input.check()?;
        let categories: Vec<String> = input.categories().into_iter().collect();
        let sql = format!(
            "INSERT INTO engineer_workloads \
                (engineer_id, engineer_name, skill_categories, skill_level, current_inquiries, \
                 completed_today, completed_this_week, completed_this_month, is_available) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, $8, COALESCE($9, true)) \
             ON CONFLICT (engineer_id) DO UPDATE SET \
                engineer_name = EXCLUDED.engineer_name, \
                skill_categories = EXCLUDED.skill_categories, \
                skill_level = EXCLUDED.skill_level, \
                current_inquiries = COALESCE($5, engineer_workloads.current_inquiries), \
                completed_today = EXCLUDED.completed_today, \
                completed_this_week = EXCLUDED.completed_this_week, \
                completed_this_month = EXCLUDED.completed_this_month, \
                is_available = EXCLUDED.is_available, \
                updated_at = NOW() \
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        let upserted = sqlx::query_as::<_, UpsertedRow>(&sql)
            .bind(engineer_id)
            .bind(input.engineer_name.trim())
            .bind(&categories)
            .bind(input.skill_level.map(i16::from))
            .bind(input.current_inquiries)
            .bind(input.completed_today)
            .bind(input.completed_this_week)
            .bind(input.completed_this_month)
            .bind(input.is_available)
            .fetch_one(pool)
            .await?;
        Ok((upserted.row, upserted.created))
    }
}
