//! Engineer assignment for incoming inquiries.
//!
//! Rule types, engineer workload snapshots, and the stateless resolver that
//! turns `(inquiry, rules, engineers)` into a suggestion or an assignment
//! decision. Writes are never performed here; the store applies them.

pub mod decision;
pub mod engineer;
pub mod error;
pub mod inquiry;
pub mod resolver;
pub mod rules;

pub use decision::{
    auto_assign, manual_assign, normalize_reason, AssignmentType, ManualAssignment,
};
pub use engineer::EngineerWorkload;
pub use error::AssignmentError;
pub use inquiry::{Inquiry, Urgency};
pub use resolver::{
    evaluate_rules, suggest_engineer, AssignmentSuggestion, SelectionBasis, SuggestionOutcome,
};
pub use rules::{AssignmentRule, RuleConditions, RuleStrategy, RuleType};
