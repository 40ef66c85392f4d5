pub mod attendance_repository;
pub mod class_repository;
pub mod ledger_repository;
pub mod member_repository;
pub mod payment_repository;
pub mod promotion_repository;

// Re-export all repositories for convenient access
pub use attendance_repository::{
    AttendanceRepository, AttendeeTypeStat, ClassTypeStat, DailyAttendanceTrend,
    MemberAttendanceEntry, MemberAttendanceStats, RosterEntry,
};
pub use class_repository::{ClassRepository, NewClass};
pub use ledger_repository::LedgerRepository;
pub use member_repository::{MemberRepository, NewMember};
pub use payment_repository::{
    NewPayment, PaymentActivityEntry, PaymentRepository, RevenueBreakdown, RevenueByPeriod,
};
pub use promotion_repository::{
    AveragePromotionTime, PromotionHistoryEntry, PromotionRepository, PromotionsByMonth,
};
