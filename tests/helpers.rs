use chrono::{NaiveDate, NaiveTime, Utc};
use dojo_backend::config::AppConfig;
use dojo_backend::models::*;
use dojo_backend::repositories::*;
use dojo_backend::{setup, AppState};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Test application wrapping a provisioned pool, the repositories and the
/// full service stack (notifications stay disabled: no relay configured).
pub struct TestApp {
    pub pool: SqlitePool,
    pub state: Arc<AppState>,
    pub member_repo: Arc<MemberRepository>,
    pub class_repo: Arc<ClassRepository>,
    pub attendance_repo: Arc<AttendanceRepository>,
    pub promotion_repo: Arc<PromotionRepository>,
    pub payment_repo: Arc<PaymentRepository>,
    pub ledger_repo: Arc<LedgerRepository>,
}

impl TestApp {
    /// Create a TestApp from a migrated pool (as handed out by sqlx::test)
    pub async fn from_pool(pool: SqlitePool) -> Self {
        setup::run(&pool).await.expect("Failed to run provisioning");

        let state = Arc::new(AppState::new(pool.clone(), &AppConfig::default()));

        Self {
            pool: pool.clone(),
            member_repo: state.member_repo.clone(),
            class_repo: state.class_repo.clone(),
            attendance_repo: state.attendance_repo.clone(),
            promotion_repo: state.promotion_repo.clone(),
            payment_repo: state.payment_repo.clone(),
            ledger_repo: state.ledger_repo.clone(),
            state,
        }
    }
}

/// Helper function to create a test member
pub async fn create_test_member(app: &TestApp, name: &str, email: &str) -> Member {
    app.member_repo
        .create(NewMember {
            member_name: name.to_string(),
            email: Some(email.to_string()),
            phone: None,
            date_of_birth: None,
            join_date: Utc::now().date_naive(),
            membership_type: "monthly".to_string(),
            monthly_fee: 100.0,
            current_belt: "white".to_string(),
        })
        .await
        .expect("Failed to create test member")
}

/// Helper function to create a test member with an explicit join date and belt
pub async fn create_test_member_with(
    app: &TestApp,
    name: &str,
    email: &str,
    join_date: NaiveDate,
    belt: &str,
    monthly_fee: f64,
) -> Member {
    app.member_repo
        .create(NewMember {
            member_name: name.to_string(),
            email: Some(email.to_string()),
            phone: None,
            date_of_birth: None,
            join_date,
            membership_type: "monthly".to_string(),
            monthly_fee,
            current_belt: belt.to_string(),
        })
        .await
        .expect("Failed to create test member")
}

/// Helper function to create a test class
pub async fn create_test_class(app: &TestApp, name: &str, date: NaiveDate) -> DojoClass {
    create_test_class_with(app, name, date, 20, 25.0, 0.0).await
}

/// Helper function to create a test class with explicit capacity and fees
pub async fn create_test_class_with(
    app: &TestApp,
    name: &str,
    date: NaiveDate,
    max_capacity: i64,
    drop_in_fee: f64,
    member_fee: f64,
) -> DojoClass {
    app.class_repo
        .create(
            NewClass {
                class_name: name.to_string(),
                class_type: "fundamentals".to_string(),
                class_date: date,
                start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
                instructor: "Professor Silva".to_string(),
                location: Some("Main Mat".to_string()),
                max_capacity,
                drop_in_fee,
                member_fee,
            },
            90,
        )
        .await
        .expect("Failed to create test class")
}

/// Helper function to create a present attendance record
pub async fn create_test_attendance(app: &TestApp, class_id: Uuid, member_id: Uuid) -> Attendance {
    app.attendance_repo
        .create(
            class_id,
            member_id,
            "present",
            "member",
            false,
            0.0,
            "not_required",
            None,
        )
        .await
        .expect("Failed to create test attendance")
}

/// Helper function to record a completed payment directly at the repository
pub async fn create_test_payment(
    app: &TestApp,
    member_id: Uuid,
    amount: f64,
    payment_date: NaiveDate,
) -> Payment {
    app.payment_repo
        .create(NewPayment {
            member_id,
            payment_type: "monthly_membership".to_string(),
            amount,
            processing_fee: 0.0,
            net_amount: amount,
            payment_date,
            payment_method: "cash".to_string(),
            status: "completed".to_string(),
            receipt_number: None,
            reference_payment_id: None,
            reference_attendance_id: None,
            description: None,
        })
        .await
        .expect("Failed to create test payment")
}

/// Assert that two members are equal (ignoring timestamps)
pub fn assert_members_equal(a: &Member, b: &Member) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.member_name, b.member_name);
    assert_eq!(a.email, b.email);
    assert_eq!(a.current_belt, b.current_belt);
}

/// Assert that two monetary amounts match to the cent
pub fn assert_money_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {:.2}, got {:.2}",
        expected,
        actual
    );
}
