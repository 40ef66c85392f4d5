use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether the member showed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            _ => Err(format!("Invalid attendance status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(AttendanceStatus::Present)
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Fee tier the attendee is charged under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeType {
    Member,
    DropIn,
    Trial,
    Guest,
}

impl AttendeeType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "member" => Ok(AttendeeType::Member),
            "drop_in" => Ok(AttendeeType::DropIn),
            "trial" => Ok(AttendeeType::Trial),
            "guest" => Ok(AttendeeType::Guest),
            _ => Err(format!("Invalid attendee type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeType::Member => "member",
            AttendeeType::DropIn => "drop_in",
            AttendeeType::Trial => "trial",
            AttendeeType::Guest => "guest",
        }
    }
}

impl From<String> for AttendeeType {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(AttendeeType::Member)
    }
}

impl From<AttendeeType> for String {
    fn from(t: AttendeeType) -> Self {
        t.as_str().to_string()
    }
}

/// Collection state of a per-class fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    NotRequired,
    Pending,
    Paid,
    Waived,
}

impl FeeStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "not_required" => Ok(FeeStatus::NotRequired),
            "pending" => Ok(FeeStatus::Pending),
            "paid" => Ok(FeeStatus::Paid),
            "waived" => Ok(FeeStatus::Waived),
            _ => Err(format!("Invalid fee status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::NotRequired => "not_required",
            FeeStatus::Pending => "pending",
            FeeStatus::Paid => "paid",
            FeeStatus::Waived => "waived",
        }
    }
}

impl From<String> for FeeStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(FeeStatus::NotRequired)
    }
}

impl From<FeeStatus> for String {
    fn from(status: FeeStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Attendance model joining a member to a class. At most one row exists per
/// (class, member) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub class_id: Uuid,
    pub member_id: Uuid,
    pub status: String, // Stored as TEXT, use AttendanceStatus enum for type safety
    pub member_type: String, // Stored as TEXT, use AttendeeType enum for type safety
    pub check_in_time: Option<NaiveDateTime>,
    pub payment_required: bool,
    pub payment_amount: f64,
    pub payment_status: String, // Stored as TEXT, use FeeStatus enum for type safety
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Attendance {
    /// Fee owed for an attendee of the given tier, and the initial collection
    /// state. Trial mats are free and waived; drop-ins and guests pay the
    /// drop-in rate.
    pub fn fee_for(
        attendee_type: AttendeeType,
        drop_in_fee: f64,
        member_fee: f64,
    ) -> (f64, FeeStatus) {
        match attendee_type {
            AttendeeType::DropIn | AttendeeType::Guest => {
                let status = if drop_in_fee > 0.0 {
                    FeeStatus::Pending
                } else {
                    FeeStatus::NotRequired
                };
                (drop_in_fee, status)
            }
            AttendeeType::Member => {
                let status = if member_fee > 0.0 {
                    FeeStatus::Pending
                } else {
                    FeeStatus::NotRequired
                };
                (member_fee, status)
            }
            AttendeeType::Trial => (0.0, FeeStatus::Waived),
        }
    }
}
