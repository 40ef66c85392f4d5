use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Class lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl ClassStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(ClassStatus::Scheduled),
            "completed" => Ok(ClassStatus::Completed),
            "cancelled" => Ok(ClassStatus::Cancelled),
            _ => Err(format!("Invalid class status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Scheduled => "scheduled",
            ClassStatus::Completed => "completed",
            ClassStatus::Cancelled => "cancelled",
        }
    }
}

impl From<String> for ClassStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(ClassStatus::Scheduled)
    }
}

impl From<ClassStatus> for String {
    fn from(status: ClassStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Program a class belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    Fundamentals,
    Advanced,
    NoGi,
    OpenMat,
    Kids,
    Competition,
    Private,
}

impl ClassType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fundamentals" => Ok(ClassType::Fundamentals),
            "advanced" => Ok(ClassType::Advanced),
            "no_gi" => Ok(ClassType::NoGi),
            "open_mat" => Ok(ClassType::OpenMat),
            "kids" => Ok(ClassType::Kids),
            "competition" => Ok(ClassType::Competition),
            "private" => Ok(ClassType::Private),
            _ => Err(format!("Invalid class type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Fundamentals => "fundamentals",
            ClassType::Advanced => "advanced",
            ClassType::NoGi => "no_gi",
            ClassType::OpenMat => "open_mat",
            ClassType::Kids => "kids",
            ClassType::Competition => "competition",
            ClassType::Private => "private",
        }
    }
}

impl From<String> for ClassType {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(ClassType::Fundamentals)
    }
}

impl From<ClassType> for String {
    fn from(t: ClassType) -> Self {
        t.as_str().to_string()
    }
}

/// Class model representing one scheduled session on the mats
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DojoClass {
    pub id: Uuid,
    pub class_name: String,
    pub class_type: String, // Stored as TEXT, use ClassType enum for type safety
    pub class_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
    pub instructor: String,
    pub location: Option<String>,
    pub max_capacity: i64,
    pub drop_in_fee: f64,
    pub member_fee: f64,
    pub status: String, // Stored as TEXT, use ClassStatus enum for type safety
    pub attendance_count: i64,
    pub total_revenue: f64,
    pub created_at: NaiveDateTime,
}

