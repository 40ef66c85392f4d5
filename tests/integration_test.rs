mod helpers;

use chrono::{Duration, NaiveTime, Utc};
use dojo_backend::error::RepositoryError;
use dojo_backend::models::LedgerLeg;
use dojo_backend::repositories::NewMember;
use helpers::*;
use sqlx::SqlitePool;

// ============================================================================
// Member repository
// ============================================================================

#[sqlx::test]
async fn test_create_and_find_member(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;
    assert_eq!(member.member_name, "Ana Souza");
    assert_eq!(member.current_belt, "white");
    assert_eq!(member.status, "active");

    let found = app
        .member_repo
        .find_by_id(member.id)
        .await
        .expect("Query failed")
        .expect("Member should exist");

    assert_members_equal(&member, &found);
}

#[sqlx::test]
async fn test_email_uniqueness_check(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;

    assert!(app
        .member_repo
        .email_taken("ana@example.com", None)
        .await
        .unwrap());
    // The member's own row does not count against them
    assert!(!app
        .member_repo
        .email_taken("ana@example.com", Some(member.id))
        .await
        .unwrap());
    assert!(!app.member_repo.email_taken("free@example.com", None).await.unwrap());

    // The UNIQUE column constraint backs the service-level check
    let duplicate = app
        .member_repo
        .create(NewMember {
            member_name: "Impostor".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
            date_of_birth: None,
            join_date: Utc::now().date_naive(),
            membership_type: "monthly".to_string(),
            monthly_fee: 80.0,
            current_belt: "white".to_string(),
        })
        .await;

    let err = RepositoryError::from(duplicate.unwrap_err());
    assert!(matches!(err, RepositoryError::Duplicate(_)));
}

#[sqlx::test]
async fn test_belt_distribution_ordering(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    create_test_member_with(&app, "A", "a@example.com", today, "blue", 100.0).await;
    create_test_member_with(&app, "B", "b@example.com", today, "white", 100.0).await;
    create_test_member_with(&app, "C", "c@example.com", today, "white", 100.0).await;
    create_test_member_with(&app, "D", "d@example.com", today, "black", 100.0).await;

    let distribution = app.member_repo.belt_distribution().await.unwrap();
    let belts: Vec<&str> = distribution.iter().map(|(b, _)| b.as_str()).collect();

    // Promotion order, not alphabetical
    assert_eq!(belts, vec!["white", "blue", "black"]);
    assert_eq!(distribution[0].1, 2);
}

// ============================================================================
// Attendance repository
// ============================================================================

#[sqlx::test]
async fn test_attendance_pair_is_unique(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;
    let class = create_test_class(&app, "Monday Fundamentals", today).await;

    create_test_attendance(&app, class.id, member.id).await;

    let duplicate = app
        .attendance_repo
        .create(
            class.id,
            member.id,
            "present",
            "member",
            false,
            0.0,
            "not_required",
            None,
        )
        .await;

    let err = RepositoryError::from(duplicate.unwrap_err());
    assert!(matches!(err, RepositoryError::Duplicate(_)));
}

#[sqlx::test]
async fn test_member_attendance_stats(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;
    let class1 = create_test_class(&app, "Class 1", today).await;
    let class2 = create_test_class(&app, "Class 2", today).await;
    let class3 = create_test_class(&app, "Class 3", today).await;

    create_test_attendance(&app, class1.id, member.id).await;
    create_test_attendance(&app, class2.id, member.id).await;
    app.attendance_repo
        .create(
            class3.id, member.id, "absent", "member", false, 0.0, "not_required", None,
        )
        .await
        .unwrap();

    let stats = app.attendance_repo.member_stats(member.id).await.unwrap();
    assert_eq!(stats.total_classes, 3);
    assert_eq!(stats.attended, 2);
    assert_eq!(stats.missed, 1);
    assert!((stats.attendance_rate - 66.67).abs() < 0.5);
}

// ============================================================================
// Class repository
// ============================================================================

#[sqlx::test]
async fn test_schedule_conflict_detection(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let evening = create_test_class(&app, "Evening Fundamentals", today).await;

    // Overlapping window on the same day
    let overlapping = app
        .class_repo
        .create(
            dojo_backend::repositories::NewClass {
                class_name: "Evening No-Gi".to_string(),
                class_type: "no_gi".to_string(),
                class_date: today,
                start_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                instructor: "Professor Costa".to_string(),
                location: None,
                max_capacity: 20,
                drop_in_fee: 25.0,
                member_fee: 0.0,
            },
            90,
        )
        .await
        .unwrap();

    let conflicts = app
        .class_repo
        .find_conflicts(
            evening.id,
            evening.class_date,
            evening.start_time,
            evening.end_time,
        )
        .await
        .unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id, overlapping.id);

    // A morning class on the same day does not conflict
    let morning = app
        .class_repo
        .create(
            dojo_backend::repositories::NewClass {
                class_name: "Morning Drills".to_string(),
                class_type: "advanced".to_string(),
                class_date: today,
                start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                instructor: "Professor Costa".to_string(),
                location: None,
                max_capacity: 20,
                drop_in_fee: 25.0,
                member_fee: 0.0,
            },
            60,
        )
        .await
        .unwrap();

    let conflicts = app
        .class_repo
        .find_conflicts(
            morning.id,
            morning.class_date,
            morning.start_time,
            morning.end_time,
        )
        .await
        .unwrap();
    assert!(conflicts.is_empty());
}

#[sqlx::test]
async fn test_weekly_window_excludes_cancelled(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let kept = create_test_class(&app, "Kept", today).await;
    let cancelled = create_test_class(&app, "Cancelled", today + Duration::days(1)).await;
    app.class_repo
        .set_status(cancelled.id, "cancelled")
        .await
        .unwrap();

    let classes = app
        .class_repo
        .find_between(today, today + Duration::days(6))
        .await
        .unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].id, kept.id);
}

// ============================================================================
// Promotion repository
// ============================================================================

#[sqlx::test]
async fn test_latest_approved_promotion_lookup(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;

    app.promotion_repo
        .create(
            member.id,
            "white",
            "blue",
            today - Duration::days(400),
            "Professor Silva",
            None,
            13,
        )
        .await
        .unwrap();
    let second = app
        .promotion_repo
        .create(
            member.id,
            "blue",
            "purple",
            today - Duration::days(30),
            "Professor Silva",
            None,
            12,
        )
        .await
        .unwrap();

    let latest = app
        .promotion_repo
        .find_latest_approved_before(member.id, today)
        .await
        .unwrap()
        .expect("Should find a promotion");
    assert_eq!(latest.id, second.id);

    // Cancelled records are invisible to the lookup
    app.promotion_repo
        .set_status(second.id, "cancelled")
        .await
        .unwrap();

    let latest = app
        .promotion_repo
        .find_latest_approved_before(member.id, today)
        .await
        .unwrap()
        .expect("Should fall back to the first promotion");
    assert_eq!(latest.to_belt, "blue");
}

// ============================================================================
// Payment repository
// ============================================================================

#[sqlx::test]
async fn test_payment_aggregates(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;

    create_test_payment(&app, member.id, 100.0, today).await;
    create_test_payment(&app, member.id, 100.0, today - Duration::days(10)).await;
    // Outside the 30-day window
    create_test_payment(&app, member.id, 50.0, today - Duration::days(45)).await;

    let window = app
        .payment_repo
        .revenue_between(Some(today - Duration::days(30)), Some(today))
        .await
        .unwrap();
    assert_money_eq(window, 200.0);

    let total = app
        .payment_repo
        .total_completed_for_member(member.id)
        .await
        .unwrap();
    assert_money_eq(total, 250.0);

    let by_type = app.payment_repo.revenue_by_type(None, None).await.unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].key, "monthly_membership");
    assert_eq!(by_type[0].count, 3);
}

// ============================================================================
// Ledger repository
// ============================================================================

#[sqlx::test]
async fn test_journal_entry_posting(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let legs = vec![
        LedgerLeg::debit("Cash", 95.0),
        LedgerLeg::credit("Membership Income", 100.0),
        LedgerLeg::debit("Payment Processing Fees", 5.0),
    ];

    let entry = app
        .ledger_repo
        .post_entry(today, Some("Test posting"), &legs)
        .await
        .unwrap();

    let fetched = app
        .ledger_repo
        .find_entry(entry.id)
        .await
        .unwrap()
        .expect("Entry should exist");
    assert_eq!(fetched.posting_date, today);

    let lines = app.ledger_repo.find_lines(entry.id).await.unwrap();
    assert_eq!(lines.len(), 3);

    let debits: f64 = lines.iter().map(|l| l.debit).sum();
    let credits: f64 = lines.iter().map(|l| l.credit).sum();
    assert_money_eq(debits, credits);
}

// ============================================================================
// Provisioning
// ============================================================================

#[sqlx::test]
async fn test_setup_is_idempotent(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;

    // TestApp::from_pool already ran provisioning once; run it again
    dojo_backend::setup::run(&app.pool).await.unwrap();

    let accounts = app.ledger_repo.list_accounts().await.unwrap();
    assert!(accounts.iter().any(|a| a.name == "Cash"));
    assert!(accounts.iter().any(|a| a.name == "Payment Processing Fees"));

    let role_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(role_count, 4);

    let template_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notification_templates")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(template_count, 4);
}
