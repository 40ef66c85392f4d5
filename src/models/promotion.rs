use super::belt::Belt;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Promotion record state. Records are append-only: cancellation flips the
/// status, it never deletes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Approved,
    Cancelled,
}

impl PromotionStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "approved" => Ok(PromotionStatus::Approved),
            "cancelled" => Ok(PromotionStatus::Cancelled),
            _ => Err(format!("Invalid promotion status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Approved => "approved",
            PromotionStatus::Cancelled => "cancelled",
        }
    }
}

impl From<String> for PromotionStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(PromotionStatus::Approved)
    }
}

impl From<PromotionStatus> for String {
    fn from(status: PromotionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Promotion model: one belt transition in a member's audit trail
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Promotion {
    pub id: Uuid,
    pub member_id: Uuid,
    pub from_belt: String, // Stored as TEXT, use Belt enum for type safety
    pub to_belt: String,   // Stored as TEXT, use Belt enum for type safety
    pub promotion_date: NaiveDate,
    pub instructor: String,
    pub notes: Option<String>,
    pub time_in_previous_belt_months: i64,
    pub status: String, // Stored as TEXT, use PromotionStatus enum for type safety
    pub certificate_issued: bool,
    pub created_at: NaiveDateTime,
}

/// Validate that a belt transition follows the promotion order: exactly one
/// rank ahead, no regressions, no skips.
pub fn validate_belt_progression(from_belt: Belt, to_belt: Belt) -> Result<(), String> {
    let from_index = from_belt.index();
    let to_index = to_belt.index();

    if to_index <= from_index {
        return Err(format!(
            "Cannot promote from {} to {}. Belt promotion must be progressive.",
            from_belt, to_belt
        ));
    }

    if to_index - from_index > 1 {
        return Err(format!(
            "Cannot skip belt levels. Must promote from {} to {} first.",
            from_belt,
            Belt::ORDER[from_index + 1]
        ));
    }

    Ok(())
}
