pub mod attendance_service;
pub mod class_service;
pub mod dashboard_service;
pub mod member_service;
pub mod notification_service;
pub mod payment_service;
pub mod promotion_service;

pub use attendance_service::AttendanceService;
pub use class_service::ClassService;
pub use dashboard_service::DashboardService;
pub use member_service::MemberService;
pub use notification_service::NotificationService;
pub use payment_service::PaymentService;
pub use promotion_service::PromotionService;
