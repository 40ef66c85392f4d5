use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ledger account kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Bank,
    Clearing,
    Income,
    Expense,
}

impl AccountType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(AccountType::Cash),
            "bank" => Ok(AccountType::Bank),
            "clearing" => Ok(AccountType::Clearing),
            "income" => Ok(AccountType::Income),
            "expense" => Ok(AccountType::Expense),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Bank => "bank",
            AccountType::Clearing => "clearing",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        }
    }
}

/// A ledger account in the chart of accounts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub name: String,
    pub account_type: String, // Stored as TEXT, use AccountType enum for type safety
}

/// A posted journal entry (header)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub posting_date: NaiveDate,
    pub remark: Option<String>,
    pub created_at: NaiveDateTime,
}

/// One debit or credit leg of a journal entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntryLine {
    pub id: Uuid,
    pub journal_entry_id: Uuid,
    pub account: String,
    pub debit: f64,
    pub credit: f64,
}

/// An unposted leg, used when building an entry
#[derive(Debug, Clone, Serialize)]
pub struct LedgerLeg {
    pub account: String,
    pub debit: f64,
    pub credit: f64,
}

impl LedgerLeg {
    pub fn debit(account: &str, amount: f64) -> Self {
        Self {
            account: account.to_string(),
            debit: amount,
            credit: 0.0,
        }
    }

    pub fn credit(account: &str, amount: f64) -> Self {
        Self {
            account: account.to_string(),
            debit: 0.0,
            credit: amount,
        }
    }
}

/// Check that a set of legs balances: total debits equal total credits
/// (to the cent).
pub fn legs_balance(legs: &[LedgerLeg]) -> bool {
    let debits: f64 = legs.iter().map(|l| l.debit).sum();
    let credits: f64 = legs.iter().map(|l| l.credit).sum();
    (debits - credits).abs() < 0.005
}
