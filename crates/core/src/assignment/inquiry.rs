//! The slice of an inquiry that routing decisions depend on.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// An inquiry as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: DbId,
    pub product_category: String,
    #[serde(default)]
    pub assigned_engineer_id: Option<DbId>,
}

impl Inquiry {
    pub fn is_assigned(&self) -> bool {
        self.assigned_engineer_id.is_some()
    }
}

/// How pressing the customer marked the inquiry. Informational for routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
            Urgency::Urgent => "urgent",
        }
    }
}
