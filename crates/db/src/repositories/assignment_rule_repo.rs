//! Repository for assignment rule settings.

use quotedesk_core::assignment::AssignmentRule;
use quotedesk_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::assignment_rule::{
    AssignmentRuleRow, CreateAssignmentRule, UpdateAssignmentRule,
};

/// Column list for `assignment_rules` queries.
const COLUMNS: &str = "id, rule_name, description, priority, is_active, rule_type, \
     min_skill_level, product_categories, auto_assign, created_at, updated_at";

/// Provides CRUD operations for assignment rules.
pub struct AssignmentRuleRepo;

impl AssignmentRuleRepo {
    /// List rules in evaluation order (priority, then id).
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<AssignmentRuleRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM assignment_rules \
             WHERE ($1 OR is_active) \
             ORDER BY priority, id"
        );
        sqlx::query_as::<_, AssignmentRuleRow>(&sql)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Load active rules in the form the resolver consumes.
    pub async fn load_active_rules(pool: &PgPool) -> Result<Vec<AssignmentRule>, StoreError> {
        let rows = Self::list(pool, false).await?;
        rows.iter()
            .map(|row| row.to_rule().map_err(StoreError::from))
            .collect()
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentRuleRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM assignment_rules WHERE id = $1");
        sqlx::query_as::<_, AssignmentRuleRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Validate and insert a new rule. New rules are active unless the
    /// input says otherwise.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssignmentRule,
    ) -> Result<AssignmentRuleRow, StoreError> {
        let (strategy, conditions) = input.check()?;
        let categories: Vec<String> = conditions.product_categories.into_iter().collect();
        let sql = format!(
            "INSERT INTO assignment_rules \
                (rule_name, description, priority, is_active, rule_type, \
                 min_skill_level, product_categories, auto_assign) \
             VALUES ($1, $2, $3, COALESCE($4, true), $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AssignmentRuleRow>(&sql)
            .bind(input.rule_name.trim())
            .bind(&input.description)
            .bind(input.priority)
            .bind(input.is_active)
            .bind(strategy.as_str())
            .bind(strategy.min_skill_level().map(i16::from))
            .bind(&categories)
            .bind(conditions.auto_assign)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Apply a partial update. Returns `Ok(None)` if no rule has `id`.
    ///
    /// The row is locked while the resulting strategy is checked against
    /// its current type, so a concurrent type change cannot slip a stray
    /// skill level past validation.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssignmentRule,
    ) -> Result<Option<AssignmentRuleRow>, StoreError> {
        input.check()?;
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM assignment_rules WHERE id = $1 FOR UPDATE");
        let Some(existing) = sqlx::query_as::<_, AssignmentRuleRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let strategy = input.resolve_strategy(&existing.strategy()?)?;

        let update = format!(
            "UPDATE assignment_rules SET \
                rule_name = COALESCE($2, rule_name), \
                description = COALESCE($3, description), \
                priority = COALESCE($4, priority), \
                rule_type = $5, \
                min_skill_level = $6, \
                product_categories = COALESCE($7, product_categories), \
                auto_assign = COALESCE($8, auto_assign), \
                is_active = COALESCE($9, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AssignmentRuleRow>(&update)
            .bind(id)
            .bind(input.rule_name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.priority)
            .bind(strategy.as_str())
            .bind(strategy.min_skill_level().map(i16::from))
            .bind(input.categories())
            .bind(input.auto_assign)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Flip `is_active`. Returns `None` if no rule has `id`.
    pub async fn toggle(pool: &PgPool, id: DbId) -> Result<Option<AssignmentRuleRow>, sqlx::Error> {
        let sql = format!(
            "UPDATE assignment_rules SET is_active = NOT is_active, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentRuleRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule. Returns `true` if a row was removed.
    ///
    /// History records that cited the rule keep their row with `rule_id`
    /// cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignment_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
