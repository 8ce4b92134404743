pub mod assignment;
pub mod assignment_rules;
pub mod engineers;
pub mod inquiries;
