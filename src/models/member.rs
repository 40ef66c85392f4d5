use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            _ => Err(format!("Invalid member status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }
}

impl From<String> for MemberStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(MemberStatus::Active)
    }
}

impl From<MemberStatus> for String {
    fn from(status: MemberStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Billing cadence for a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    Monthly,
    Annual,
}

impl MembershipType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(MembershipType::Monthly),
            "annual" => Ok(MembershipType::Annual),
            _ => Err(format!("Invalid membership type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Monthly => "monthly",
            MembershipType::Annual => "annual",
        }
    }
}

impl From<String> for MembershipType {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(MembershipType::Monthly)
    }
}

impl From<MembershipType> for String {
    fn from(t: MembershipType) -> Self {
        t.as_str().to_string()
    }
}

/// Derived payment standing of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStanding {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStanding {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(PaymentStanding::Paid),
            "pending" => Ok(PaymentStanding::Pending),
            "overdue" => Ok(PaymentStanding::Overdue),
            _ => Err(format!("Invalid payment standing: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStanding::Paid => "paid",
            PaymentStanding::Pending => "pending",
            PaymentStanding::Overdue => "overdue",
        }
    }
}

impl From<String> for PaymentStanding {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(PaymentStanding::Paid)
    }
}

impl From<PaymentStanding> for String {
    fn from(s: PaymentStanding) -> Self {
        s.as_str().to_string()
    }
}

/// Member model representing an enrolled student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub member_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub join_date: NaiveDate,
    pub status: String, // Stored as TEXT, use MemberStatus enum for type safety
    pub membership_type: String, // Stored as TEXT, use MembershipType enum for type safety
    pub monthly_fee: f64,
    pub current_belt: String, // Stored as TEXT, use Belt enum for type safety
    pub belt_promotion_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub next_payment_due: Option<NaiveDate>,
    pub payment_status: String, // Stored as TEXT, use PaymentStanding enum for type safety
    pub outstanding_amount: f64,
    pub total_paid: f64,
    pub last_attendance_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Member {
    /// Calendar months between join date and `as_of`, clamped to at least 1
    pub fn months_since_joining(&self, as_of: NaiveDate) -> i64 {
        months_between(self.join_date, as_of).max(1)
    }

    /// Whole months the member has held the current belt as of `as_of`,
    /// counting from the last promotion or, failing that, the join date.
    pub fn months_in_current_belt(&self, as_of: NaiveDate) -> i64 {
        let since = self.belt_promotion_date.unwrap_or(self.join_date);
        (as_of - since).num_days() / 30
    }

    /// Derive the payment standing from the outstanding amount and due date:
    /// paid when nothing is outstanding, overdue past the due date, pending
    /// within the week before it.
    pub fn derive_payment_standing(&self, today: NaiveDate) -> PaymentStanding {
        let due = match self.next_payment_due {
            Some(d) => d,
            None => return PaymentStanding::from(self.payment_status.clone()),
        };

        if self.outstanding_amount <= 0.0 {
            PaymentStanding::Paid
        } else if today > due {
            PaymentStanding::Overdue
        } else if today >= due - chrono::Duration::days(7) {
            PaymentStanding::Pending
        } else {
            PaymentStanding::Paid
        }
    }
}

/// Calendar-month difference between two dates (year and month components
/// only, day-of-month ignored).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}
