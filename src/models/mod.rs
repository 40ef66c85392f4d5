//! Domain models for the dojo backend.
//!
//! This module contains all database-backed models representing
//! the core entities of the dojo management platform.

pub mod attendance;
pub mod belt;
pub mod class;
pub mod ledger;
pub mod member;
pub mod payment;
pub mod promotion;

// Re-export all models for convenient access
pub use attendance::{Attendance, AttendanceStatus, AttendeeType, FeeStatus};
pub use belt::{Belt, BeltRequirements};
pub use class::{ClassStatus, ClassType, DojoClass};
pub use ledger::{Account, AccountType, JournalEntry, JournalEntryLine, LedgerLeg};
pub use member::{Member, MemberStatus, MembershipType, PaymentStanding};
pub use payment::{Payment, PaymentMethod, PaymentRecordStatus, PaymentType};
pub use promotion::{Promotion, PromotionStatus};
