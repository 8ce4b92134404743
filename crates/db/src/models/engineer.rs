//! Models for engineer workload records.

use std::collections::BTreeSet;

use quotedesk_core::assignment::rules::{
    normalize_categories, validate_categories, validate_skill_level,
};
use quotedesk_core::assignment::EngineerWorkload;
use quotedesk_core::error::CoreError;
use quotedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `engineer_workloads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EngineerWorkloadRow {
    pub engineer_id: DbId,
    pub engineer_name: String,
    pub skill_categories: Vec<String>,
    pub skill_level: Option<i16>,
    pub current_inquiries: i32,
    pub completed_today: i32,
    pub completed_this_week: i32,
    pub completed_this_month: i32,
    pub is_available: bool,
    pub last_assigned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EngineerWorkloadRow {
    /// The snapshot the resolver ranks. Counts are non-negative by table
    /// constraint.
    pub fn to_workload(&self) -> EngineerWorkload {
        let count = |n: i32| u32::try_from(n).unwrap_or(0);
        EngineerWorkload {
            engineer_id: self.engineer_id,
            engineer_name: self.engineer_name.clone(),
            skill_categories: self.skill_categories.iter().cloned().collect(),
            skill_level: self.skill_level.and_then(|l| u8::try_from(l).ok()),
            current_inquiries: count(self.current_inquiries),
            completed_today: count(self.completed_today),
            completed_this_week: count(self.completed_this_week),
            completed_this_month: count(self.completed_this_month),
            is_available: self.is_available,
            last_assigned_at: self.last_assigned_at,
        }
    }
}

/// DTO for creating or replacing an engineer's workload record.
///
/// `current_inquiries` is normally maintained by assignment writes; when
/// omitted on update the stored count is kept.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertEngineerWorkload {
    #[validate(length(min = 1, max = 128))]
    pub engineer_name: String,
    #[serde(default)]
    pub skill_categories: Vec<String>,
    pub skill_level: Option<u8>,
    #[validate(range(min = 0))]
    pub current_inquiries: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub completed_today: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub completed_this_week: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub completed_this_month: i32,
    pub is_available: Option<bool>,
}

impl UpsertEngineerWorkload {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        validate_categories(&self.skill_categories)?;
        if let Some(level) = self.skill_level {
            validate_skill_level(level)?;
        }
        Ok(())
    }

    pub fn categories(&self) -> BTreeSet<String> {
        normalize_categories(&self.skill_categories)
    }
}

/// Listing filter for engineer workloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineerFilter {
    /// Only engineers skilled in this product category.
    pub category: Option<String>,
    /// Only engineers currently available.
    #[serde(default)]
    pub available_only: bool,
}
