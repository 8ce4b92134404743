//! Rule matching and engineer suggestion.
//!
//! Both entry points are pure: identical `(inquiry, rules, engineers)`
//! inputs always produce an identical result, so the suggestion shown in the
//! UI stays stable across re-renders and concurrent requests need no
//! coordination.

use serde::{Deserialize, Serialize};

use super::engineer::EngineerWorkload;
use super::inquiry::Inquiry;
use super::rules::{AssignmentRule, RuleStrategy};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Reason given when no active rule accepts the inquiry's category.
pub const REASON_NO_MATCHING_RULE: &str = "no matching rule";

/// Reason given when the roster is empty. Also the prefix used when no
/// engineer in the roster is qualified for the category.
pub const REASON_NO_ENGINEERS: &str = "no engineers available";

/// Reason prefix when the governing `auto` rule has auto-assign switched off.
pub const REASON_AUTO_ASSIGN_DISABLED: &str = "auto-assign disabled for matching rule";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Machine-readable companion to [`AssignmentSuggestion::reason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionOutcome {
    Suggested,
    NoMatchingRule,
    NoEngineersAvailable,
    AutoAssignDisabled,
}

/// The criterion that selected the suggested engineer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBasis {
    LowestWorkload,
    SkillMatch,
    SkillFallback,
    LeastRecentlyAssigned,
    RotationFallback,
}

impl SelectionBasis {
    pub fn describe(&self) -> &'static str {
        match self {
            SelectionBasis::LowestWorkload => "lowest current workload among qualified engineers",
            SelectionBasis::SkillMatch => {
                "lowest current workload among qualified engineers meeting the minimum skill level"
            }
            SelectionBasis::SkillFallback => {
                "no engineer meets the minimum skill level; lowest current workload among qualified engineers"
            }
            SelectionBasis::LeastRecentlyAssigned => {
                "least recently assigned among qualified engineers"
            }
            SelectionBasis::RotationFallback => {
                "no rotation history available; lowest current workload among qualified engineers"
            }
        }
    }
}

/// Advisory result of [`suggest_engineer`]. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSuggestion {
    pub suggested_engineer: Option<EngineerWorkload>,
    pub reason: String,
    /// Every active matching rule, governing rule first.
    pub matching_rules: Vec<AssignmentRule>,
    pub outcome: SuggestionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<SelectionBasis>,
}

impl AssignmentSuggestion {
    /// The highest-priority matching rule, if any rule matched.
    pub fn governing_rule(&self) -> Option<&AssignmentRule> {
        self.matching_rules.first()
    }

    fn without_engineer(
        matching_rules: Vec<AssignmentRule>,
        outcome: SuggestionOutcome,
        reason: String,
    ) -> Self {
        Self {
            suggested_engineer: None,
            reason,
            matching_rules,
            outcome,
            basis: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule evaluation
// ---------------------------------------------------------------------------

/// Return the active rules whose conditions accept the inquiry, ordered by
/// ascending priority with rule id as the tie-break.
pub fn evaluate_rules(inquiry: &Inquiry, rules: &[AssignmentRule]) -> Vec<AssignmentRule> {
    let mut matching: Vec<AssignmentRule> = rules
        .iter()
        .filter(|rule| rule.is_active && rule.matches_category(&inquiry.product_category))
        .cloned()
        .collect();
    matching.sort_by_key(|rule| (rule.priority, rule.id));
    matching
}

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

/// Suggest an engineer for `inquiry` under the governing rule.
///
/// Never fails: every "no answer" case is reported through
/// [`AssignmentSuggestion::outcome`] with a human-readable reason.
pub fn suggest_engineer(
    inquiry: &Inquiry,
    rules: &[AssignmentRule],
    engineers: &[EngineerWorkload],
) -> AssignmentSuggestion {
    let matching_rules = evaluate_rules(inquiry, rules);

    let Some(governing) = matching_rules.first() else {
        return AssignmentSuggestion::without_engineer(
            Vec::new(),
            SuggestionOutcome::NoMatchingRule,
            REASON_NO_MATCHING_RULE.to_string(),
        );
    };

    if engineers.is_empty() {
        return AssignmentSuggestion::without_engineer(
            matching_rules,
            SuggestionOutcome::NoEngineersAvailable,
            REASON_NO_ENGINEERS.to_string(),
        );
    }

    if governing.strategy == RuleStrategy::Auto && !governing.conditions.auto_assign {
        let reason = format!("{REASON_AUTO_ASSIGN_DISABLED} '{}'", governing.rule_name);
        return AssignmentSuggestion::without_engineer(
            matching_rules,
            SuggestionOutcome::AutoAssignDisabled,
            reason,
        );
    }

    let category = inquiry.product_category.as_str();
    let qualified: Vec<&EngineerWorkload> = engineers
        .iter()
        .filter(|e| e.is_qualified_for(category))
        .collect();

    let Some((engineer, basis)) = select(&governing.strategy, &qualified) else {
        let reason = format!(
            "{REASON_NO_ENGINEERS} for category '{category}' under rule '{}'",
            governing.rule_name
        );
        return AssignmentSuggestion::without_engineer(
            matching_rules,
            SuggestionOutcome::NoEngineersAvailable,
            reason,
        );
    };

    let reason = format!(
        "matched rule '{}' \u{2014} {}",
        governing.rule_name,
        basis.describe()
    );

    AssignmentSuggestion {
        suggested_engineer: Some(engineer.clone()),
        reason,
        matching_rules,
        outcome: SuggestionOutcome::Suggested,
        basis: Some(basis),
    }
}

/// Apply a rule strategy to the qualified set.
fn select<'a>(
    strategy: &RuleStrategy,
    qualified: &[&'a EngineerWorkload],
) -> Option<(&'a EngineerWorkload, SelectionBasis)> {
    match strategy {
        RuleStrategy::Auto | RuleStrategy::LoadBalance => {
            lowest_workload(qualified.iter().copied()).map(|e| (e, SelectionBasis::LowestWorkload))
        }
        RuleStrategy::SkillBased { min_skill_level } => {
            let skilled = qualified
                .iter()
                .copied()
                .filter(|e| e.meets_skill_level(*min_skill_level));
            if let Some(e) = lowest_workload(skilled) {
                let basis = if min_skill_level.is_some() {
                    SelectionBasis::SkillMatch
                } else {
                    SelectionBasis::LowestWorkload
                };
                return Some((e, basis));
            }
            lowest_workload(qualified.iter().copied()).map(|e| (e, SelectionBasis::SkillFallback))
        }
        RuleStrategy::Rotation => {
            let has_history = qualified.iter().any(|e| e.last_assigned_at.is_some());
            if !has_history {
                return lowest_workload(qualified.iter().copied())
                    .map(|e| (e, SelectionBasis::RotationFallback));
            }
            // `None` orders before any timestamp, so never-assigned engineers go first.
            qualified
                .iter()
                .copied()
                .min_by_key(|e| (e.last_assigned_at, e.current_inquiries, e.engineer_id))
                .map(|e| (e, SelectionBasis::LeastRecentlyAssigned))
        }
    }
}

/// Lowest `current_inquiries`, ties broken by the lower engineer id.
fn lowest_workload<'a>(
    candidates: impl Iterator<Item = &'a EngineerWorkload>,
) -> Option<&'a EngineerWorkload> {
    candidates.min_by_key(|e| (e.current_inquiries, e.engineer_id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
