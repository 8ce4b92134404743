//! Row types and create/update DTOs for each table.

pub mod assignment_history;
pub mod assignment_rule;
pub mod engineer;
pub mod inquiry;
