//! QuoteDesk in-process event bus.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the event envelope published after state changes.
//! - [`EventLogger`]: background subscriber that writes every event to the
//!   tracing log.

pub mod bus;
pub mod logger;

pub use bus::{DomainEvent, EventBus};
pub use logger::EventLogger;

/// Published after an assignment write changes an inquiry's engineer.
pub const EVENT_INQUIRY_ASSIGNED: &str = "inquiry.assigned";

/// Published after an assignment rule is created, updated, toggled or deleted.
pub const EVENT_ASSIGNMENT_RULE_CHANGED: &str = "assignment_rule.changed";
