use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a payment was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    MonthlyMembership,
    AnnualMembership,
    ClassFee,
    PrivateLesson,
    SeminarFee,
    Merchandise,
    RegistrationFee,
    LateFee,
    Refund,
}

impl PaymentType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "monthly_membership" => Ok(PaymentType::MonthlyMembership),
            "annual_membership" => Ok(PaymentType::AnnualMembership),
            "class_fee" => Ok(PaymentType::ClassFee),
            "private_lesson" => Ok(PaymentType::PrivateLesson),
            "seminar_fee" => Ok(PaymentType::SeminarFee),
            "merchandise" => Ok(PaymentType::Merchandise),
            "registration_fee" => Ok(PaymentType::RegistrationFee),
            "late_fee" => Ok(PaymentType::LateFee),
            "refund" => Ok(PaymentType::Refund),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::MonthlyMembership => "monthly_membership",
            PaymentType::AnnualMembership => "annual_membership",
            PaymentType::ClassFee => "class_fee",
            PaymentType::PrivateLesson => "private_lesson",
            PaymentType::SeminarFee => "seminar_fee",
            PaymentType::Merchandise => "merchandise",
            PaymentType::RegistrationFee => "registration_fee",
            PaymentType::LateFee => "late_fee",
            PaymentType::Refund => "refund",
        }
    }

    /// Whether completing a payment of this type rolls the member's billing
    /// cycle forward
    pub fn is_membership(&self) -> bool {
        matches!(
            self,
            PaymentType::MonthlyMembership | PaymentType::AnnualMembership
        )
    }

    /// Income account credited when a payment of this type completes
    pub fn income_account(&self) -> &'static str {
        match self {
            PaymentType::MonthlyMembership | PaymentType::AnnualMembership => "Membership Income",
            PaymentType::ClassFee => "Class Fee Income",
            PaymentType::PrivateLesson => "Private Lesson Income",
            PaymentType::SeminarFee => "Seminar Income",
            PaymentType::Merchandise => "Merchandise Sales",
            PaymentType::RegistrationFee => "Registration Income",
            PaymentType::LateFee => "Late Fee Income",
            PaymentType::Refund => "Other Income",
        }
    }
}

impl From<String> for PaymentType {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(PaymentType::MonthlyMembership)
    }
}

impl From<PaymentType> for String {
    fn from(t: PaymentType) -> Self {
        t.as_str().to_string()
    }
}

/// How the money arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    Check,
    PayPal,
    Stripe,
}

impl PaymentMethod {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "check" => Ok(PaymentMethod::Check),
            "paypal" => Ok(PaymentMethod::PayPal),
            "stripe" => Ok(PaymentMethod::Stripe),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Check => "check",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::Stripe => "stripe",
        }
    }

    /// Cash or clearing account debited when a payment by this method
    /// completes
    pub fn cash_account(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card Clearing",
            PaymentMethod::DebitCard | PaymentMethod::BankTransfer | PaymentMethod::Check => "Bank",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Stripe => "Stripe",
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(PaymentMethod::Cash)
    }
}

impl From<PaymentMethod> for String {
    fn from(m: PaymentMethod) -> Self {
        m.as_str().to_string()
    }
}

/// Payment record state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Completed,
    Cancelled,
    Refunded,
}

impl PaymentRecordStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(PaymentRecordStatus::Completed),
            "cancelled" => Ok(PaymentRecordStatus::Cancelled),
            "refunded" => Ok(PaymentRecordStatus::Refunded),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Completed => "completed",
            PaymentRecordStatus::Cancelled => "cancelled",
            PaymentRecordStatus::Refunded => "refunded",
        }
    }
}

impl From<String> for PaymentRecordStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(PaymentRecordStatus::Completed)
    }
}

impl From<PaymentRecordStatus> for String {
    fn from(status: PaymentRecordStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Payment model: one financial transaction for a member. Refunds are
/// separate counter-records with negative amounts; history is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub payment_type: String, // Stored as TEXT, use PaymentType enum for type safety
    pub amount: f64,
    pub processing_fee: f64,
    pub net_amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: String, // Stored as TEXT, use PaymentMethod enum for type safety
    pub status: String, // Stored as TEXT, use PaymentRecordStatus enum for type safety
    pub receipt_number: Option<String>,
    pub reference_payment_id: Option<Uuid>,
    pub reference_attendance_id: Option<Uuid>,
    pub description: Option<String>,
    pub journal_entry_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl Payment {
    /// Validate the amounts of a charge (refund counter-records are exempt:
    /// they carry a negative amount by construction)
    pub fn validate_amounts(amount: f64, processing_fee: f64) -> Result<(), String> {
        if amount <= 0.0 {
            return Err("Payment amount must be greater than zero".to_string());
        }
        if processing_fee < 0.0 {
            return Err("Processing fee cannot be negative".to_string());
        }
        if processing_fee >= amount {
            return Err(
                "Processing fee cannot be greater than or equal to payment amount".to_string(),
            );
        }
        Ok(())
    }

    /// Net amount after the processing fee, rounded to cents
    pub fn net_of(amount: f64, processing_fee: f64) -> f64 {
        round_cents(amount - processing_fee)
    }
}

/// Round a monetary amount to two decimal places
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
