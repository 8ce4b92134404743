//! Assignment rule types and rule-settings validation.

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest skill level an engineer can hold.
pub const MIN_SKILL_LEVEL: u8 = 1;

/// Highest skill level an engineer can hold.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Largest priority value accepted from the settings screen.
pub const MAX_PRIORITY: i32 = 10_000;

/// Maximum length of a rule name.
const MAX_RULE_NAME_LEN: usize = 128;

/// Maximum number of product categories a single rule may list.
const MAX_CATEGORIES: usize = 64;

/// Maximum length of a single product category.
const MAX_CATEGORY_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A configured assignment policy.
///
/// Rules are evaluated in ascending `priority` order (ties broken by `id`).
/// The strategy is serialized as a flattened `rule_type` tag, so a
/// skill-based rule looks like
/// `{"rule_type": "skill_based", "min_skill_level": 3, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub id: DbId,
    pub rule_name: String,
    pub priority: i32,
    pub is_active: bool,
    pub conditions: RuleConditions,
    #[serde(flatten)]
    pub strategy: RuleStrategy,
}

/// Conditions shared by every rule type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    /// Categories the rule applies to. Empty matches any category.
    #[serde(default)]
    pub product_categories: BTreeSet<String>,
    /// Whether the rule permits system-initiated assignment.
    #[serde(default)]
    pub auto_assign: bool,
}

/// How the governing rule picks an engineer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleStrategy {
    /// Load balancing gated on `conditions.auto_assign`.
    Auto,
    /// Least recently assigned qualified engineer.
    Rotation,
    /// Lowest current workload among qualified engineers.
    LoadBalance,
    /// Qualified engineers at or above a skill level, lowest workload first.
    SkillBased {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_skill_level: Option<u8>,
    },
}

/// The bare `rule_type` discriminant, used by settings payloads that carry
/// strategy fields separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Auto,
    Rotation,
    LoadBalance,
    SkillBased,
}

impl RuleType {
    /// The snake_case name stored in the `rule_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Auto => "auto",
            RuleType::Rotation => "rotation",
            RuleType::LoadBalance => "load_balance",
            RuleType::SkillBased => "skill_based",
        }
    }
}

impl FromStr for RuleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(RuleType::Auto),
            "rotation" => Ok(RuleType::Rotation),
            "load_balance" => Ok(RuleType::LoadBalance),
            "skill_based" => Ok(RuleType::SkillBased),
            other => Err(CoreError::Validation(format!("Unknown rule type: \"{other}\""))),
        }
    }
}

impl RuleStrategy {
    /// Assemble a strategy from a rule type and its optional skill minimum.
    ///
    /// A skill minimum on anything other than a skill-based rule is refused
    /// rather than dropped.
    pub fn from_parts(
        rule_type: RuleType,
        min_skill_level: Option<u8>,
    ) -> Result<Self, CoreError> {
        let strategy = match (rule_type, min_skill_level) {
            (RuleType::SkillBased, level) => RuleStrategy::SkillBased {
                min_skill_level: level,
            },
            (_, Some(_)) => {
                return Err(CoreError::Validation(
                    "min_skill_level only applies to skill_based rules".to_string(),
                ))
            }
            (RuleType::Auto, None) => RuleStrategy::Auto,
            (RuleType::Rotation, None) => RuleStrategy::Rotation,
            (RuleType::LoadBalance, None) => RuleStrategy::LoadBalance,
        };
        validate_strategy(&strategy)?;
        Ok(strategy)
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleStrategy::Auto => RuleType::Auto,
            RuleStrategy::Rotation => RuleType::Rotation,
            RuleStrategy::LoadBalance => RuleType::LoadBalance,
            RuleStrategy::SkillBased { .. } => RuleType::SkillBased,
        }
    }

    pub fn min_skill_level(&self) -> Option<u8> {
        match self {
            RuleStrategy::SkillBased { min_skill_level } => *min_skill_level,
            _ => None,
        }
    }

    /// The snake_case name used in API payloads and log fields.
    pub fn as_str(&self) -> &'static str {
        self.rule_type().as_str()
    }
}

impl AssignmentRule {
    /// Whether this rule's conditions accept the given product category.
    pub fn matches_category(&self, category: &str) -> bool {
        self.conditions.product_categories.is_empty()
            || self.conditions.product_categories.contains(category)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a rule display name.
///
/// Rules:
/// - Must not be blank.
/// - Must not exceed `MAX_RULE_NAME_LEN` characters.
pub fn validate_rule_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Rule name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_RULE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Rule name must not exceed {MAX_RULE_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a rule priority. Must be within `0..=MAX_PRIORITY`.
pub fn validate_priority(priority: i32) -> Result<(), CoreError> {
    if !(0..=MAX_PRIORITY).contains(&priority) {
        return Err(CoreError::Validation(format!(
            "Priority must be between 0 and {MAX_PRIORITY}, got {priority}"
        )));
    }
    Ok(())
}

/// Validate a skill level against the `1..=5` scale.
pub fn validate_skill_level(level: u8) -> Result<(), CoreError> {
    if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&level) {
        return Err(CoreError::Validation(format!(
            "Skill level must be between {MIN_SKILL_LEVEL} and {MAX_SKILL_LEVEL}, got {level}"
        )));
    }
    Ok(())
}

/// Validate a list of product categories.
///
/// Rules:
/// - At most `MAX_CATEGORIES` entries.
/// - Each entry must not be blank and must not exceed `MAX_CATEGORY_LEN`.
/// - No duplicates once surrounding whitespace is trimmed.
pub fn validate_categories(categories: &[String]) -> Result<(), CoreError> {
    if categories.len() > MAX_CATEGORIES {
        return Err(CoreError::Validation(format!(
            "A rule may list at most {MAX_CATEGORIES} product categories"
        )));
    }
    let mut seen = HashSet::with_capacity(categories.len());
    for (i, category) in categories.iter().enumerate() {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(format!(
                "Product category at index {i} must not be empty"
            )));
        }
        if trimmed.chars().count() > MAX_CATEGORY_LEN {
            return Err(CoreError::Validation(format!(
                "Product category at index {i} exceeds {MAX_CATEGORY_LEN} characters"
            )));
        }
        if !seen.insert(trimmed) {
            return Err(CoreError::Validation(format!(
                "Duplicate product category: \"{trimmed}\""
            )));
        }
    }
    Ok(())
}

/// Validate the strategy-specific fields of a rule.
pub fn validate_strategy(strategy: &RuleStrategy) -> Result<(), CoreError> {
    if let RuleStrategy::SkillBased {
        min_skill_level: Some(level),
    } = strategy
    {
        validate_skill_level(*level)?;
    }
    Ok(())
}

/// Normalize raw category input into the set form stored on a rule.
pub fn normalize_categories(categories: &[String]) -> BTreeSet<String> {
    categories.iter().map(|c| c.trim().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
