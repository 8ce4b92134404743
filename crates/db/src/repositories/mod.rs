//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assignment_history_repo;
pub mod assignment_rule_repo;
pub mod engineer_repo;
pub mod inquiry_repo;

pub use assignment_history_repo::AssignmentHistoryRepo;
pub use assignment_rule_repo::AssignmentRuleRepo;
pub use engineer_repo::EngineerRepo;
pub use inquiry_repo::{AssignmentWrite, InquiryRepo};
