//! Models for inquiries.

use quotedesk_core::assignment::{Inquiry, Urgency};
use quotedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InquiryRow {
    pub id: DbId,
    /// `INQ-` followed by the zero-padded id; generated by the database.
    pub inquiry_number: String,
    pub customer_name: String,
    pub product_category: String,
    pub urgency: String,
    pub assigned_engineer_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    /// Optimistic-lock counter, bumped on every assignment write.
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InquiryRow {
    /// The routing view consumed by the resolver.
    pub fn to_inquiry(&self) -> Inquiry {
        Inquiry {
            id: self.id,
            product_category: self.product_category.clone(),
            assigned_engineer_id: self.assigned_engineer_id,
        }
    }
}

/// DTO for creating an inquiry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInquiry {
    #[validate(length(min = 1, max = 256))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 64))]
    pub product_category: String,
    #[serde(default)]
    pub urgency: Urgency,
}

/// Listing filter for inquiries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryFilter {
    /// Only inquiries with no engineer set.
    #[serde(default)]
    pub unassigned: bool,
}
