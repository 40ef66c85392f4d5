mod helpers;

use chrono::{Duration, Months, Utc};
use dojo_backend::models::{PaymentMethod, PaymentType};
use dojo_backend::repositories::NewMember;
use dojo_backend::services::attendance_service::AttendanceRequest;
use dojo_backend::services::promotion_service::PromotionRequest;
use helpers::*;
use sqlx::SqlitePool;

/// End-to-end flow: enrollment, attendance, payment with ledger postings,
/// promotion, cancellation and refund.
#[sqlx::test]
async fn test_complete_member_lifecycle(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    // Step 1: Enroll a member
    let member = app
        .state
        .member_service
        .enroll(NewMember {
            member_name: "Ana Souza".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            date_of_birth: None,
            join_date: today,
            membership_type: "monthly".to_string(),
            monthly_fee: 100.0,
            current_belt: "white".to_string(),
        })
        .await
        .expect("Enrollment should succeed");

    assert_eq!(member.current_belt, "white");
    assert_eq!(
        member.next_payment_due,
        today.checked_add_months(Months::new(1))
    );

    // Duplicate email is rejected
    let duplicate = app
        .state
        .member_service
        .enroll(NewMember {
            member_name: "Someone Else".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
            date_of_birth: None,
            join_date: today,
            membership_type: "monthly".to_string(),
            monthly_fee: 100.0,
            current_belt: "white".to_string(),
        })
        .await;
    assert!(duplicate.is_err());

    // Step 2: Schedule a class and mark attendance
    let class = create_test_class_with(&app, "Monday Fundamentals", today, 20, 25.0, 10.0).await;

    let results = app
        .state
        .attendance_service
        .bulk_mark(
            class.id,
            vec![AttendanceRequest {
                member_id: member.id,
                status: Some("present".to_string()),
                member_type: Some("member".to_string()),
                notes: None,
            }],
        )
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, "success");

    // Derived class stats and the member's last-attendance date update
    let class = app
        .state
        .class_repo
        .find_by_id(class.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(class.attendance_count, 1);
    assert_money_eq(class.total_revenue, 10.0);

    let member_row = app
        .state
        .member_repo
        .find_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member_row.last_attendance_date, Some(today));

    // Re-marking the same pair updates rather than duplicates
    app.state
        .attendance_service
        .mark(
            class.id,
            AttendanceRequest {
                member_id: member.id,
                status: Some("late".to_string()),
                member_type: Some("member".to_string()),
                notes: Some("arrived mid warm-up".to_string()),
            },
        )
        .await
        .expect("Re-marking should succeed");

    let summary = app
        .state
        .attendance_service
        .class_summary(class.id)
        .await
        .unwrap();
    assert_eq!(summary.summary["total_registered"], 1);

    // Step 3: Record a membership payment
    let payment = app
        .state
        .payment_service
        .create_payment(
            member.id,
            PaymentType::MonthlyMembership,
            100.0,
            5.0,
            PaymentMethod::CreditCard,
            Some(today),
            None,
            None,
        )
        .await
        .expect("Payment should succeed");

    assert_money_eq(payment.amount, 100.0);
    assert_money_eq(payment.net_amount, 95.0);
    assert_eq!(payment.receipt_number.as_deref(), Some("RCP-000001"));

    // Billing rolled forward and financials refreshed
    let member_row = app
        .state
        .member_repo
        .find_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member_row.last_payment_date, Some(today));
    assert_eq!(
        member_row.next_payment_due,
        today.checked_add_months(Months::new(1))
    );
    assert_eq!(member_row.payment_status, "paid");
    assert_money_eq(member_row.total_paid, 100.0);
    assert_money_eq(member_row.outstanding_amount, 0.0);

    // Balanced ledger entry was posted and linked
    let payment_row = app
        .state
        .payment_repo
        .find_by_id(payment.id)
        .await
        .unwrap()
        .unwrap();
    let entry_id = payment_row
        .journal_entry_id
        .expect("Journal entry should be linked");
    let lines = app.state.ledger_repo.find_lines(entry_id).await.unwrap();
    assert_eq!(lines.len(), 3);
    let debits: f64 = lines.iter().map(|l| l.debit).sum();
    let credits: f64 = lines.iter().map(|l| l.credit).sum();
    assert_money_eq(debits, credits);
    assert!(lines
        .iter()
        .any(|l| l.account == "Credit Card Clearing" && l.debit > 0.0));
    assert!(lines
        .iter()
        .any(|l| l.account == "Membership Income" && l.credit > 0.0));

    // Step 4: Belt promotion
    let skip = app
        .state
        .promotion_service
        .promote(PromotionRequest {
            member_id: member.id,
            to_belt: "purple".to_string(),
            promotion_date: Some(today),
            instructor: "Professor Silva".to_string(),
            notes: None,
        })
        .await;
    assert!(skip.is_err(), "Skipping blue must be rejected");

    let promotion = app
        .state
        .promotion_service
        .promote(PromotionRequest {
            member_id: member.id,
            to_belt: "blue".to_string(),
            promotion_date: Some(today),
            instructor: "Professor Silva".to_string(),
            notes: Some("Strong guard retention".to_string()),
        })
        .await
        .expect("White to blue should succeed");

    let member_row = app
        .state
        .member_repo
        .find_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member_row.current_belt, "blue");
    assert_eq!(member_row.belt_promotion_date, Some(today));

    let certified = app
        .state
        .promotion_service
        .issue_certificate(promotion.id)
        .await
        .expect("Certificate issuance should succeed");
    assert!(certified.certificate_issued);

    // Eligibility right after promotion: nothing met yet
    let report = app
        .state
        .promotion_service
        .eligibility(member.id)
        .await
        .unwrap();
    assert!(!report.eligible);
    assert_eq!(report.current_belt, "blue");
    assert!(!report.reasons.is_empty());

    // Step 5: Cancel the promotion; belt state falls back
    app.state
        .promotion_service
        .cancel(promotion.id)
        .await
        .expect("Cancellation should succeed");

    let member_row = app
        .state
        .member_repo
        .find_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member_row.current_belt, "white");
    assert_eq!(member_row.belt_promotion_date, None);

    // No certificates for cancelled promotions
    let blocked = app
        .state
        .promotion_service
        .issue_certificate(promotion.id)
        .await;
    assert!(blocked.is_err());

    // Step 6: Refunds
    let over = app
        .state
        .payment_service
        .refund(payment.id, 150.0, "too much")
        .await;
    assert!(over.is_err(), "Refund above the original must be rejected");

    let partial = app
        .state
        .payment_service
        .refund(payment.id, 30.0, "billing correction")
        .await
        .expect("Partial refund should succeed");
    assert_money_eq(partial.amount, -30.0);

    let original = app
        .state
        .payment_repo
        .find_by_id(payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, "completed");

    // Refunding more than the remainder is rejected
    let too_much = app
        .state
        .payment_service
        .refund(payment.id, 80.0, "over the remainder")
        .await;
    assert!(too_much.is_err());

    let rest = app
        .state
        .payment_service
        .refund(payment.id, 70.0, "membership cancelled")
        .await
        .expect("Remaining refund should succeed");
    assert_money_eq(rest.amount, -70.0);

    let original = app
        .state
        .payment_repo
        .find_by_id(payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, "refunded");

    let member_row = app
        .state
        .member_repo
        .find_by_id(member.id)
        .await
        .unwrap()
        .unwrap();
    assert_money_eq(member_row.total_paid, 0.0);

    // Step 7: Dashboard reflects the activity
    let stats = app.state.dashboard_service.stats().await.unwrap();
    assert_eq!(stats.total_members, 1);
    assert_eq!(stats.active_members, 1);
    assert_eq!(stats.classes_today, 1);
    assert_eq!(stats.attendance_today, 0); // re-marked as late
    assert_eq!(stats.promotions_this_month, 0); // cancelled

    let activity = app.state.dashboard_service.recent_activity().await.unwrap();
    assert!(activity.iter().any(|a| a.activity_type == "payment"));
}

/// Bulk operations collect per-item outcomes instead of aborting
#[sqlx::test]
async fn test_bulk_operations_collect_errors(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let ana = create_test_member(&app, "Ana Souza", "ana2@example.com").await;
    let bia = create_test_member_with(
        &app,
        "Bia Lima",
        "bia@example.com",
        today - Duration::days(400),
        "blue",
        100.0,
    )
    .await;

    let results = app
        .state
        .promotion_service
        .bulk_promote(vec![
            PromotionRequest {
                member_id: ana.id,
                to_belt: "blue".to_string(),
                promotion_date: None,
                instructor: "Professor Silva".to_string(),
                notes: None,
            },
            // Invalid: blue cannot skip to brown
            PromotionRequest {
                member_id: bia.id,
                to_belt: "brown".to_string(),
                promotion_date: None,
                instructor: "Professor Silva".to_string(),
                notes: None,
            },
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, "success");
    assert!(results[0].promotion_id.is_some());
    assert_eq!(results[1].status, "error");
    assert!(results[1].error.as_deref().unwrap_or("").contains("skip"));

    // The failed item left no record behind
    let history = app
        .state
        .promotion_service
        .history(Some(bia.id), 10)
        .await
        .unwrap();
    assert!(history.is_empty());
}

/// Capacity is enforced when attendance stats refresh
#[sqlx::test]
async fn test_capacity_enforced_on_marking(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let class = create_test_class_with(&app, "Tiny Mat", today, 1, 0.0, 0.0).await;
    let ana = create_test_member(&app, "Ana Souza", "ana3@example.com").await;
    let bia = create_test_member(&app, "Bia Lima", "bia3@example.com").await;

    app.state
        .attendance_service
        .mark(
            class.id,
            AttendanceRequest {
                member_id: ana.id,
                status: Some("present".to_string()),
                member_type: None,
                notes: None,
            },
        )
        .await
        .expect("First attendee fits");

    let overflow = app
        .state
        .attendance_service
        .mark(
            class.id,
            AttendanceRequest {
                member_id: bia.id,
                status: Some("present".to_string()),
                member_type: None,
                notes: None,
            },
        )
        .await;

    let err = overflow.expect_err("Second attendee exceeds capacity");
    assert!(err.to_string().contains("capacity"));
}

/// Collecting a per-class fee records exactly one class-fee payment
#[sqlx::test]
async fn test_fee_collection_creates_payment(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;
    let today = Utc::now().date_naive();

    let class = create_test_class_with(&app, "Open Mat", today, 30, 25.0, 0.0).await;
    let guest = create_test_member(&app, "Visiting Guest", "guest@example.com").await;

    let attendance = app
        .state
        .attendance_service
        .mark(
            class.id,
            AttendanceRequest {
                member_id: guest.id,
                status: Some("present".to_string()),
                member_type: Some("drop_in".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert!(attendance.payment_required);
    assert_money_eq(attendance.payment_amount, 25.0);
    assert_eq!(attendance.payment_status, "pending");

    let collected = app
        .state
        .attendance_service
        .mark_fee_received(attendance.id, None)
        .await
        .unwrap();
    assert_eq!(collected.payment_status, "paid");

    let payment = app
        .state
        .payment_service
        .payment_for_attendance(attendance.id)
        .await
        .unwrap()
        .expect("A class-fee payment should exist");
    assert_eq!(payment.payment_type, "class_fee");
    assert_money_eq(payment.amount, 25.0);

    // Collecting twice does not double-bill
    app.state
        .attendance_service
        .mark_fee_received(attendance.id, None)
        .await
        .unwrap();

    let history = app
        .state
        .payment_service
        .member_history(guest.id, 10)
        .await
        .unwrap();
    let class_fees = history
        .iter()
        .filter(|p| p.payment_type == "class_fee")
        .count();
    assert_eq!(class_fees, 1);
}
