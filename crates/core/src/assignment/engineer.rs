//! Engineer workload snapshots consumed by the resolver.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// One engineer's qualifications and current load, as seen by the caller.
///
/// `completed_*` counters are informational and never consulted when
/// matching. `last_assigned_at` is rotation metadata; `None` means no
/// assignment history is known for this engineer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineerWorkload {
    pub engineer_id: DbId,
    pub engineer_name: String,
    #[serde(default)]
    pub skill_categories: BTreeSet<String>,
    #[serde(default)]
    pub skill_level: Option<u8>,
    #[serde(default)]
    pub current_inquiries: u32,
    #[serde(default)]
    pub completed_today: u32,
    #[serde(default)]
    pub completed_this_week: u32,
    #[serde(default)]
    pub completed_this_month: u32,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub last_assigned_at: Option<Timestamp>,
}

fn default_available() -> bool {
    true
}

impl EngineerWorkload {
    /// Available and skilled in `category`.
    pub fn is_qualified_for(&self, category: &str) -> bool {
        self.is_available && self.skill_categories.contains(category)
    }

    /// Whether the engineer meets an optional minimum skill level.
    ///
    /// A missing `skill_level` fails any minimum.
    pub fn meets_skill_level(&self, min_skill_level: Option<u8>) -> bool {
        match min_skill_level {
            None => true,
            Some(min) => self.skill_level.is_some_and(|level| level >= min),
        }
    }
}
