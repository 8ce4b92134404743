//! Assignment decisions: automatic selection and manual-assignment checks.
//!
//! Both functions only decide. The write to `assigned_engineer_id` is a
//! separate compare-and-set command owned by the store.

use serde::{Deserialize, Serialize};

use super::engineer::EngineerWorkload;
use super::error::AssignmentError;
use super::inquiry::Inquiry;
use super::resolver::{suggest_engineer, SuggestionOutcome};
use super::rules::AssignmentRule;
use crate::types::DbId;

/// Maximum length of a manual assignment reason.
pub const MAX_REASON_LEN: usize = 500;

/// Whether a manual assignment sets a first engineer or replaces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Assign,
    Reassign,
    /// Only produced by [`auto_assign`]; never accepted from a manual request.
    Auto,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Assign => "assign",
            AssignmentType::Reassign => "reassign",
            AssignmentType::Auto => "auto",
        }
    }
}

/// A validated manual assignment, ready to hand to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAssignment {
    pub inquiry_id: DbId,
    pub engineer_id: DbId,
    pub previous_engineer_id: Option<DbId>,
    pub reason: Option<String>,
    pub assignment_type: AssignmentType,
}

/// Decide which engineer an inquiry should be auto-assigned to.
///
/// An existing assignment always wins: an inquiry with an engineer set
/// yields [`AssignmentError::AlreadyAssigned`] regardless of the rule set.
pub fn auto_assign(
    inquiry: &Inquiry,
    rules: &[AssignmentRule],
    engineers: &[EngineerWorkload],
) -> Result<DbId, AssignmentError> {
    if let Some(engineer_id) = inquiry.assigned_engineer_id {
        return Err(AssignmentError::AlreadyAssigned {
            inquiry_id: inquiry.id,
            engineer_id,
        });
    }

    let suggestion = suggest_engineer(inquiry, rules, engineers);
    let rule_name = || {
        suggestion
            .governing_rule()
            .map(|r| r.rule_name.clone())
            .unwrap_or_default()
    };

    match suggestion.outcome {
        SuggestionOutcome::NoMatchingRule => Err(AssignmentError::NoMatch),
        SuggestionOutcome::NoEngineersAvailable => Err(AssignmentError::NoEngineersAvailable {
            category: inquiry.product_category.clone(),
        }),
        SuggestionOutcome::AutoAssignDisabled => Err(AssignmentError::AutoAssignDisabled {
            rule_name: rule_name(),
        }),
        SuggestionOutcome::Suggested => {
            let auto_allowed = suggestion
                .governing_rule()
                .is_some_and(|r| r.conditions.auto_assign);
            if !auto_allowed {
                return Err(AssignmentError::AutoAssignDisabled {
                    rule_name: rule_name(),
                });
            }
            suggestion
                .suggested_engineer
                .as_ref()
                .map(|e| e.engineer_id)
                .ok_or(AssignmentError::NoMatch)
        }
    }
}

/// Validate a manual assignment against the supplied roster.
///
/// - The engineer must be in `engineers`.
/// - `Reassign` requires a current engineer different from the new one.
/// - `Assign` on an already-assigned inquiry is refused; changing an
///   existing assignment needs an explicit `Reassign`.
pub fn manual_assign(
    inquiry: &Inquiry,
    engineers: &[EngineerWorkload],
    engineer_id: DbId,
    reason: Option<&str>,
    assignment_type: AssignmentType,
) -> Result<ManualAssignment, AssignmentError> {
    if !engineers.iter().any(|e| e.engineer_id == engineer_id) {
        return Err(AssignmentError::UnknownEngineer { engineer_id });
    }

    match (assignment_type, inquiry.assigned_engineer_id) {
        (AssignmentType::Auto, _) => {
            return Err(AssignmentError::InvalidReassignment(
                "auto assignments cannot be submitted manually".to_string(),
            ));
        }
        (AssignmentType::Reassign, None) => {
            return Err(AssignmentError::InvalidReassignment(format!(
                "inquiry {} has no engineer to reassign from",
                inquiry.id
            )));
        }
        (AssignmentType::Reassign, Some(current)) if current == engineer_id => {
            return Err(AssignmentError::InvalidReassignment(format!(
                "inquiry {} is already assigned to engineer {engineer_id}",
                inquiry.id
            )));
        }
        (AssignmentType::Assign, Some(current)) => {
            return Err(AssignmentError::AlreadyAssigned {
                inquiry_id: inquiry.id,
                engineer_id: current,
            });
        }
        _ => {}
    }

    Ok(ManualAssignment {
        inquiry_id: inquiry.id,
        engineer_id,
        previous_engineer_id: inquiry.assigned_engineer_id,
        reason: normalize_reason(reason),
        assignment_type,
    })
}

/// Trim a free-text reason, drop it when blank and cap it at
/// [`MAX_REASON_LEN`] characters.
pub fn normalize_reason(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| r.chars().take(MAX_REASON_LEN).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::assignment::rules::{RuleConditions, RuleStrategy};

    fn rule(strategy: RuleStrategy, auto_assign: bool) -> AssignmentRule {
        AssignmentRule {
            id: 1,
            rule_name: "Bolts desk".to_string(),
            priority: 10,
            is_active: true,
            conditions: RuleConditions {
                product_categories: ["bolts".to_string()].into_iter().collect(),
                auto_assign,
            },
            strategy,
        }
    }

    fn engineer(id: DbId, current: u32) -> EngineerWorkload {
        EngineerWorkload {
            engineer_id: id,
            engineer_name: format!("Engineer {id}"),
            skill_categories: ["bolts".to_string()].into_iter().collect(),
            skill_level: Some(3),
            current_inquiries: current,
            completed_today: 0,
            completed_this_week: 0,
            completed_this_month: 0,
            is_available: true,
            last_assigned_at: None,
        }
    }

    fn inquiry(category: &str, assigned: Option<DbId>) -> Inquiry {
        Inquiry {
            id: 42,
            product_category: category.to_string(),
            assigned_engineer_id: assigned,
        }
    }

    // -- auto_assign ------------------------------------------------------------

    #[test]
    fn auto_assign_returns_suggested_engineer() {
        let rules = vec![rule(RuleStrategy::LoadBalance, true)];
        let engineers = vec![engineer(1, 3), engineer(2, 1)];
        assert_eq!(auto_assign(&inquiry("bolts", None), &rules, &engineers), Ok(2));
    }

    #[test]
    fn auto_assign_never_overrides_existing_assignment() {
        let engineers = vec![engineer(1, 0)];
        let rule_sets = vec![
            vec![],
            vec![rule(RuleStrategy::LoadBalance, true)],
            vec![rule(RuleStrategy::Auto, false)],
        ];
        for rules in rule_sets {
            assert_matches!(
                auto_assign(&inquiry("bolts", Some(7)), &rules, &engineers),
                Err(AssignmentError::AlreadyAssigned {
                    inquiry_id: 42,
                    engineer_id: 7
                })
            );
        }
    }

    #[test]
    fn scenario_c_auto_assign_disabled() {
        let rules = vec![rule(RuleStrategy::LoadBalance, false)];
        let err = auto_assign(&inquiry("bolts", None), &rules, &[engineer(1, 0)]).unwrap_err();
        assert_matches!(err, AssignmentError::AutoAssignDisabled { ref rule_name } if rule_name == "Bolts desk");
        assert!(err.to_string().to_lowercase().contains("auto-assign disabled"));
    }

    #[test]
    fn auto_rule_with_auto_assign_off_is_disabled() {
        let rules = vec![rule(RuleStrategy::Auto, false)];
        assert_matches!(
            auto_assign(&inquiry("bolts", None), &rules, &[engineer(1, 0)]),
            Err(AssignmentError::AutoAssignDisabled { .. })
        );
    }

    #[test]
    fn auto_assign_without_matching_rule_is_no_match() {
        let rules = vec![rule(RuleStrategy::LoadBalance, true)];
        assert_matches!(
            auto_assign(&inquiry("nuts", None), &rules, &[engineer(1, 0)]),
            Err(AssignmentError::NoMatch)
        );
    }

    #[test]
    fn auto_assign_with_empty_roster() {
        let rules = vec![rule(RuleStrategy::LoadBalance, true)];
        assert_matches!(
            auto_assign(&inquiry("bolts", None), &rules, &[]),
            Err(AssignmentError::NoEngineersAvailable { ref category }) if category == "bolts"
        );
    }

    // -- manual_assign ----------------------------------------------------------

    #[test]
    fn manual_assign_to_roster_engineer() {
        let engineers = vec![engineer(1, 0), engineer(2, 0)];
        let cmd = manual_assign(
            &inquiry("bolts", None),
            &engineers,
            2,
            Some("  customer asked for Dana  "),
            AssignmentType::Assign,
        )
        .unwrap();
        assert_eq!(cmd.engineer_id, 2);
        assert_eq!(cmd.previous_engineer_id, None);
        assert_eq!(cmd.reason.as_deref(), Some("customer asked for Dana"));
    }

    #[test]
    fn manual_assign_unknown_engineer_rejected() {
        assert_matches!(
            manual_assign(&inquiry("bolts", None), &[engineer(1, 0)], 99, None, AssignmentType::Assign),
            Err(AssignmentError::UnknownEngineer { engineer_id: 99 })
        );
    }

    #[test]
    fn reassign_unassigned_inquiry_rejected() {
        assert_matches!(
            manual_assign(&inquiry("bolts", None), &[engineer(1, 0)], 1, None, AssignmentType::Reassign),
            Err(AssignmentError::InvalidReassignment(_))
        );
    }

    #[test]
    fn reassign_to_same_engineer_rejected() {
        assert_matches!(
            manual_assign(&inquiry("bolts", Some(1)), &[engineer(1, 0)], 1, None, AssignmentType::Reassign),
            Err(AssignmentError::InvalidReassignment(_))
        );
    }

    #[test]
    fn reassign_records_previous_engineer() {
        let engineers = vec![engineer(1, 0), engineer(2, 0)];
        let cmd = manual_assign(
            &inquiry("bolts", Some(1)),
            &engineers,
            2,
            None,
            AssignmentType::Reassign,
        )
        .unwrap();
        assert_eq!(cmd.previous_engineer_id, Some(1));
        assert_eq!(cmd.assignment_type, AssignmentType::Reassign);
        assert!(cmd.reason.is_none());
    }

    #[test]
    fn plain_assign_over_existing_assignment_rejected() {
        let engineers = vec![engineer(1, 0), engineer(2, 0)];
        assert_matches!(
            manual_assign(&inquiry("bolts", Some(1)), &engineers, 2, None, AssignmentType::Assign),
            Err(AssignmentError::AlreadyAssigned { engineer_id: 1, .. })
        );
    }

    #[test]
    fn manual_auto_type_rejected() {
        assert_matches!(
            manual_assign(&inquiry("bolts", None), &[engineer(1, 0)], 1, None, AssignmentType::Auto),
            Err(AssignmentError::InvalidReassignment(_))
        );
    }

    #[test]
    fn reason_is_trimmed_and_capped() {
        assert_eq!(normalize_reason(Some("   ")), None);
        assert_eq!(normalize_reason(None), None);
        let long = format!("  {}  ", "x".repeat(MAX_REASON_LEN + 20));
        assert_eq!(normalize_reason(Some(&long)).unwrap().chars().count(), MAX_REASON_LEN);
    }
}
