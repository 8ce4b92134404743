//! Models for assignment rule settings.

use quotedesk_core::assignment::rules::{
    normalize_categories, validate_categories, validate_priority, validate_rule_name,
};
use quotedesk_core::assignment::{AssignmentRule, RuleConditions, RuleStrategy, RuleType};
use quotedesk_core::error::CoreError;
use quotedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assignment_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRuleRow {
    pub id: DbId,
    pub rule_name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    /// One of `auto`, `rotation`, `load_balance`, `skill_based`.
    pub rule_type: String,
    pub min_skill_level: Option<i16>,
    pub product_categories: Vec<String>,
    pub auto_assign: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssignmentRuleRow {
    /// Rebuild the typed strategy from the `rule_type` and
    /// `min_skill_level` columns.
    pub fn strategy(&self) -> Result<RuleStrategy, CoreError> {
        let rule_type: RuleType = self.rule_type.parse()?;
        let level = self
            .min_skill_level
            .map(|l| {
                u8::try_from(l).map_err(|_| {
                    CoreError::Validation(format!("Rule {} has skill level {l}", self.id))
                })
            })
            .transpose()?;
        RuleStrategy::from_parts(rule_type, level)
    }

    /// The form the resolver consumes.
    pub fn to_rule(&self) -> Result<AssignmentRule, CoreError> {
        Ok(AssignmentRule {
            id: self.id,
            rule_name: self.rule_name.clone(),
            priority: self.priority,
            is_active: self.is_active,
            conditions: RuleConditions {
                product_categories: self.product_categories.iter().cloned().collect(),
                auto_assign: self.auto_assign,
            },
            strategy: self.strategy()?,
        })
    }
}

/// DTO for creating an assignment rule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRule {
    #[validate(length(min = 1, max = 128))]
    pub rule_name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 10000))]
    pub priority: i32,
    pub rule_type: RuleType,
    #[validate(range(min = 1, max = 5))]
    pub min_skill_level: Option<u8>,
    #[serde(default)]
    pub product_categories: Vec<String>,
    #[serde(default)]
    pub auto_assign: bool,
    pub is_active: Option<bool>,
}

impl CreateAssignmentRule {
    /// Run field-level and domain validation, returning the strategy and
    /// conditions the new row will hold.
    pub fn check(&self) -> Result<(RuleStrategy, RuleConditions), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        validate_rule_name(&self.rule_name)?;
        validate_priority(self.priority)?;
        validate_categories(&self.product_categories)?;
        let strategy = RuleStrategy::from_parts(self.rule_type, self.min_skill_level)?;
        let conditions = RuleConditions {
            product_categories: normalize_categories(&self.product_categories),
            auto_assign: self.auto_assign,
        };
        Ok((strategy, conditions))
    }
}

/// DTO for updating an assignment rule. All fields are optional.
///
/// `min_skill_level` without `rule_type` adjusts the level of an existing
/// skill-based rule.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAssignmentRule {
    #[validate(length(min = 1, max = 128))]
    pub rule_name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 10000))]
    pub priority: Option<i32>,
    pub rule_type: Option<RuleType>,
    #[validate(range(min = 1, max = 5))]
    pub min_skill_level: Option<u8>,
    pub product_categories: Option<Vec<String>>,
    pub auto_assign: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateAssignmentRule {
    /// Validate the fields that are present.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if let Some(name) = &self.rule_name {
            validate_rule_name(name)?;
        }
        if let Some(priority) = self.priority {
            validate_priority(priority)?;
        }
        if let Some(categories) = &self.product_categories {
            validate_categories(categories)?;
        }
        Ok(())
    }

    /// The strategy the rule will hold once this update is applied on top
    /// of `current`.
    pub fn resolve_strategy(&self, current: &RuleStrategy) -> Result<RuleStrategy, CoreError> {
        let rule_type = self.rule_type.unwrap_or(current.rule_type());
        let min_skill_level = match (self.min_skill_level, rule_type) {
            (Some(level), _) => Some(level),
            (None, RuleType::SkillBased) if self.rule_type.is_none() => current.min_skill_level(),
            (None, _) => None,
        };
        RuleStrategy::from_parts(rule_type, min_skill_level)
    }

    /// Trimmed, de-duplicated categories, if the update replaces them.
    pub fn categories(&self) -> Option<Vec<String>> {
        self.product_categories
            .as_deref()
            .map(|c| normalize_categories(c).into_iter().collect())
    }
}
