use chrono::{NaiveDate, Utc};
use dojo_backend::config::AppConfig;
use dojo_backend::models::member::months_between;
use dojo_backend::models::payment::round_cents;
use dojo_backend::models::promotion::validate_belt_progression;
use dojo_backend::models::*;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn member_fixture(join_date: NaiveDate) -> Member {
    Member {
        id: Uuid::new_v4(),
        member_name: "Test Member".to_string(),
        email: Some("test@example.com".to_string()),
        phone: None,
        date_of_birth: None,
        join_date,
        status: "active".to_string(),
        membership_type: "monthly".to_string(),
        monthly_fee: 100.0,
        current_belt: "white".to_string(),
        belt_promotion_date: None,
        last_payment_date: None,
        next_payment_due: None,
        payment_status: "paid".to_string(),
        outstanding_amount: 0.0,
        total_paid: 0.0,
        last_attendance_date: None,
        created_at: Utc::now().naive_utc(),
        updated_at: Utc::now().naive_utc(),
    }
}

// ============================================================================
// Belt progression
// ============================================================================

#[test]
fn test_belt_order_is_total() {
    let order = Belt::ORDER;
    assert_eq!(order.len(), 7);
    assert_eq!(order[0], Belt::White);
    assert_eq!(order[6], Belt::Red);

    for window in order.windows(2) {
        assert!(window[0].index() + 1 == window[1].index());
    }
}

#[test]
fn test_belt_next() {
    assert_eq!(Belt::White.next(), Some(Belt::Blue));
    assert_eq!(Belt::Black.next(), Some(Belt::Coral));
    assert_eq!(Belt::Coral.next(), Some(Belt::Red));
    assert_eq!(Belt::Red.next(), None);
}

#[test]
fn test_belt_string_round_trip() {
    for belt in Belt::ORDER {
        assert_eq!(Belt::from_str(belt.as_str()), Ok(belt));
    }
    assert!(Belt::from_str("rainbow").is_err());
}

#[test]
fn test_single_step_promotions_accepted() {
    for window in Belt::ORDER.windows(2) {
        assert!(validate_belt_progression(window[0], window[1]).is_ok());
    }
}

#[test]
fn test_belt_skip_rejected() {
    // White straight to purple skips blue
    let err = validate_belt_progression(Belt::White, Belt::Purple).unwrap_err();
    assert!(err.contains("skip"));
    assert!(err.contains("blue"));

    assert!(validate_belt_progression(Belt::Blue, Belt::Black).is_err());
}

#[test]
fn test_belt_regression_rejected() {
    let err = validate_belt_progression(Belt::Purple, Belt::Blue).unwrap_err();
    assert!(err.contains("progressive"));

    // Same belt is not a promotion either
    assert!(validate_belt_progression(Belt::Blue, Belt::Blue).is_err());
}

#[test]
fn test_belt_requirements_table() {
    let white = Belt::White.requirements().unwrap();
    assert_eq!(white.min_time_months, 12);
    assert_eq!(white.min_classes, 100);
    assert_eq!(white.min_attendance_rate, 70.0);
    assert_eq!(white.next_belt, Belt::Blue);

    let black = Belt::Black.requirements().unwrap();
    assert_eq!(black.min_time_months, 36);
    assert_eq!(black.min_classes, 500);
    assert_eq!(black.next_belt, Belt::Coral);

    assert!(Belt::Coral.requirements().is_none());
    assert!(Belt::Red.requirements().is_none());
}

// ============================================================================
// Payments
// ============================================================================

#[test]
fn test_payment_net_amount() {
    // $100 with a $5 fee nets $95
    assert_eq!(Payment::net_of(100.0, 5.0), 95.0);
    assert_eq!(Payment::net_of(49.99, 0.0), 49.99);
}

#[test]
fn test_payment_amount_validation() {
    assert!(Payment::validate_amounts(100.0, 5.0).is_ok());
    assert!(Payment::validate_amounts(0.0, 0.0).is_err());
    assert!(Payment::validate_amounts(-10.0, 0.0).is_err());
    // Fee equal to or above the amount is rejected
    assert!(Payment::validate_amounts(100.0, 100.0).is_err());
    assert!(Payment::validate_amounts(100.0, 120.0).is_err());
    assert!(Payment::validate_amounts(100.0, -1.0).is_err());
}

#[test]
fn test_round_cents() {
    assert_eq!(round_cents(10.005), 10.01);
    assert_eq!(round_cents(10.004), 10.0);
    assert_eq!(round_cents(-12.345), -12.35);
}

#[test]
fn test_payment_type_accounts() {
    assert_eq!(
        PaymentType::MonthlyMembership.income_account(),
        "Membership Income"
    );
    assert_eq!(PaymentType::ClassFee.income_account(), "Class Fee Income");
    assert_eq!(PaymentMethod::Cash.cash_account(), "Cash");
    assert_eq!(PaymentMethod::Check.cash_account(), "Bank");
    assert_eq!(
        PaymentMethod::CreditCard.cash_account(),
        "Credit Card Clearing"
    );
}

#[test]
fn test_membership_payment_types() {
    assert!(PaymentType::MonthlyMembership.is_membership());
    assert!(PaymentType::AnnualMembership.is_membership());
    assert!(!PaymentType::ClassFee.is_membership());
    assert!(!PaymentType::Refund.is_membership());
}

// ============================================================================
// Ledger
// ============================================================================

#[test]
fn test_balanced_legs() {
    let legs = vec![
        LedgerLeg::debit("Cash", 95.0),
        LedgerLeg::credit("Membership Income", 100.0),
        LedgerLeg::debit("Payment Processing Fees", 5.0),
    ];
    assert!(dojo_backend::models::ledger::legs_balance(&legs));

    let unbalanced = vec![
        LedgerLeg::debit("Cash", 100.0),
        LedgerLeg::credit("Membership Income", 95.0),
    ];
    assert!(!dojo_backend::models::ledger::legs_balance(&unbalanced));
}

// ============================================================================
// Member derived fields
// ============================================================================

#[test]
fn test_months_between() {
    assert_eq!(months_between(date(2024, 1, 15), date(2024, 3, 1)), 2);
    assert_eq!(months_between(date(2023, 11, 1), date(2024, 2, 1)), 3);
    assert_eq!(months_between(date(2024, 5, 1), date(2024, 5, 30)), 0);
}

#[test]
fn test_months_since_joining_has_floor() {
    let member = member_fixture(date(2024, 6, 1));
    // Same month still counts as one billing period
    assert_eq!(member.months_since_joining(date(2024, 6, 20)), 1);
    assert_eq!(member.months_since_joining(date(2024, 9, 1)), 3);
}

#[test]
fn test_months_in_current_belt_prefers_promotion_date() {
    let mut member = member_fixture(date(2022, 1, 1));
    assert!(member.months_in_current_belt(date(2023, 1, 1)) >= 12);

    member.belt_promotion_date = Some(date(2022, 12, 1));
    let months = member.months_in_current_belt(date(2023, 1, 1));
    assert!(months >= 1 && months < 2);
}

#[test]
fn test_payment_standing_windows() {
    let mut member = member_fixture(date(2024, 1, 1));
    member.next_payment_due = Some(date(2024, 6, 15));
    member.outstanding_amount = 100.0;

    // Past the due date: overdue
    assert_eq!(
        member.derive_payment_standing(date(2024, 6, 16)),
        PaymentStanding::Overdue
    );
    // Within the week before the due date: pending
    assert_eq!(
        member.derive_payment_standing(date(2024, 6, 10)),
        PaymentStanding::Pending
    );
    assert_eq!(
        member.derive_payment_standing(date(2024, 6, 8)),
        PaymentStanding::Pending
    );
    // Well before the due date: still considered paid up
    assert_eq!(
        member.derive_payment_standing(date(2024, 6, 1)),
        PaymentStanding::Paid
    );
    // Nothing outstanding: paid regardless of the date
    member.outstanding_amount = 0.0;
    assert_eq!(
        member.derive_payment_standing(date(2024, 7, 1)),
        PaymentStanding::Paid
    );
}

// ============================================================================
// Attendance fee tiers
// ============================================================================

#[test]
fn test_fee_tiers() {
    // Drop-ins and guests pay the drop-in rate
    assert_eq!(
        Attendance::fee_for(AttendeeType::DropIn, 25.0, 10.0),
        (25.0, FeeStatus::Pending)
    );
    assert_eq!(
        Attendance::fee_for(AttendeeType::Guest, 25.0, 10.0),
        (25.0, FeeStatus::Pending)
    );
    // Members pay the member rate
    assert_eq!(
        Attendance::fee_for(AttendeeType::Member, 25.0, 10.0),
        (10.0, FeeStatus::Pending)
    );
    // Trials are free and waived
    assert_eq!(
        Attendance::fee_for(AttendeeType::Trial, 25.0, 10.0),
        (0.0, FeeStatus::Waived)
    );
    // No fee configured means nothing to collect
    assert_eq!(
        Attendance::fee_for(AttendeeType::Member, 25.0, 0.0),
        (0.0, FeeStatus::NotRequired)
    );
}

// ============================================================================
// Enum conversions
// ============================================================================

#[test]
fn test_status_enum_conversions() {
    assert_eq!(MemberStatus::Active.as_str(), "active");
    assert_eq!(ClassStatus::Cancelled.as_str(), "cancelled");
    assert_eq!(AttendanceStatus::Present.as_str(), "present");
    assert_eq!(PromotionStatus::Approved.as_str(), "approved");
    assert_eq!(PaymentRecordStatus::Refunded.as_str(), "refunded");

    assert_eq!(
        PaymentType::from_str("annual_membership"),
        Ok(PaymentType::AnnualMembership)
    );
    assert_eq!(PaymentMethod::from_str("stripe"), Ok(PaymentMethod::Stripe));
    assert_eq!(AttendeeType::from_str("drop_in"), Ok(AttendeeType::DropIn));
    assert!(AttendeeType::from_str("walrus").is_err());
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.http_port, 8080);
    assert!(config.is_development());
    assert_eq!(config.dojo_name, "BJJ Dojo");
}
