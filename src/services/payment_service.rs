use crate::error::{AppError, AppResult};
use crate::models::{
    ledger::legs_balance, payment::round_cents, LedgerLeg, Member, Payment, PaymentMethod,
    PaymentRecordStatus, PaymentType,
};
use crate::repositories::{
    LedgerRepository, MemberRepository, NewPayment, PaymentRepository, RevenueBreakdown,
    RevenueByPeriod,
};
use crate::services::{member_service::next_due_date, NotificationService};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Payment summary payload for reporting
#[derive(Debug, Serialize)]
pub struct PaymentSummary {
    pub total_revenue: f64,
    pub revenue_by_type: Vec<RevenueBreakdown>,
    pub revenue_by_method: Vec<RevenueBreakdown>,
    pub daily_revenue: Vec<RevenueByPeriod>,
}

/// Service handling payment completion, refunds and ledger side effects
pub struct PaymentService {
    payment_repo: Arc<PaymentRepository>,
    member_repo: Arc<MemberRepository>,
    ledger_repo: Arc<LedgerRepository>,
    notifications: Arc<NotificationService>,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<PaymentRepository>,
        member_repo: Arc<MemberRepository>,
        ledger_repo: Arc<LedgerRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            payment_repo,
            member_repo,
            ledger_repo,
            notifications,
        }
    }

    /// Record a completed payment for a member. Validates the amounts,
    /// assigns a receipt number, rolls membership billing forward, refreshes
    /// the member's financial rollups, and posts ledger entries best-effort.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment(
        &self,
        member_id: Uuid,
        payment_type: PaymentType,
        amount: f64,
        processing_fee: f64,
        payment_method: PaymentMethod,
        payment_date: Option<NaiveDate>,
        description: Option<String>,
        reference_attendance_id: Option<Uuid>,
    ) -> AppResult<Payment> {
        let member = self.require_member(member_id).await?;

        Payment::validate_amounts(amount, processing_fee).map_err(AppError::Validation)?;

        let amount = round_cents(amount);
        let processing_fee = round_cents(processing_fee);
        let net_amount = Payment::net_of(amount, processing_fee);
        let payment_date = payment_date.unwrap_or_else(|| Utc::now().date_naive());

        let receipt_number = self.next_receipt_number().await?;
        let description = description.unwrap_or_else(|| {
            format!(
                "{} payment for {}",
                payment_type.as_str(),
                member.member_name
            )
        });

        let payment = self
            .payment_repo
            .create(NewPayment {
                member_id,
                payment_type: payment_type.as_str().to_string(),
                amount,
                processing_fee,
                net_amount,
                payment_date,
                payment_method: payment_method.as_str().to_string(),
                status: "completed".to_string(),
                receipt_number: Some(receipt_number.clone()),
                reference_payment_id: None,
                reference_attendance_id,
                description: Some(description),
            })
            .await
            .map_err(AppError::from)?;

        info!(
            "Recorded {} payment of {:.2} for member {} (receipt {})",
            payment_type.as_str(),
            amount,
            member.member_name,
            receipt_number
        );

        // Membership payments roll the billing cycle forward.
        if payment_type.is_membership() {
            let months = if payment_type == PaymentType::AnnualMembership {
                12
            } else {
                1
            };

            self.member_repo
                .update_billing(
                    member_id,
                    payment_date,
                    next_due_date(payment_date, months),
                    "paid",
                )
                .await
                .map_err(AppError::from)?;
        }

        self.refresh_member_financials(&member, payment_date).await?;

        // Ledger posting and the receipt note must not fail the payment.
        self.post_ledger_entries(&payment, payment_type, payment_method)
            .await;

        self.notifications
            .send(
                member.email.as_deref(),
                "payment_receipt",
                vec![
                    ("member_name", member.member_name.clone()),
                    ("receipt_number", receipt_number),
                    ("payment_type", payment_type.as_str().to_string()),
                    ("amount", format!("{:.2}", amount)),
                    ("payment_date", payment_date.to_string()),
                    ("payment_method", payment_method.as_str().to_string()),
                ],
            )
            .await;

        Ok(payment)
    }

    /// Refund part or all of a completed payment. History is append-only:
    /// the refund is a counter-record with a negative amount, and the
    /// original flips to refunded only once fully refunded.
    pub async fn refund(
        &self,
        payment_id: Uuid,
        refund_amount: f64,
        reason: &str,
    ) -> AppResult<Payment> {
        let original = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", payment_id)))?;

        if original.status != PaymentRecordStatus::Completed.as_str() {
            return Err(AppError::BusinessLogic(
                "Can only refund completed payments".to_string(),
            ));
        }

        if refund_amount <= 0.0 {
            return Err(AppError::Validation(
                "Refund amount must be greater than zero".to_string(),
            ));
        }

        let refund_amount = round_cents(refund_amount);
        let already_refunded = self
            .payment_repo
            .total_refunded_for(payment_id)
            .await
            .map_err(AppError::from)?;

        if refund_amount + already_refunded > original.amount + 0.005 {
            return Err(AppError::BusinessLogic(
                "Refund amount cannot exceed original payment amount".to_string(),
            ));
        }

        let member = self.require_member(original.member_id).await?;
        let today = Utc::now().date_naive();

        let refund = self
            .payment_repo
            .create(NewPayment {
                member_id: original.member_id,
                payment_type: PaymentType::Refund.as_str().to_string(),
                amount: -refund_amount,
                processing_fee: 0.0,
                net_amount: -refund_amount,
                payment_date: today,
                payment_method: original.payment_method.clone(),
                status: "completed".to_string(),
                receipt_number: None,
                reference_payment_id: Some(payment_id),
                reference_attendance_id: None,
                description: Some(format!("Refund for {} - {}", payment_id, reason)),
            })
            .await
            .map_err(AppError::from)?;

        if refund_amount + already_refunded >= original.amount - 0.005 {
            self.payment_repo
                .set_status(payment_id, PaymentRecordStatus::Refunded.as_str())
                .await
                .map_err(AppError::from)?;
        }

        info!(
            "Refunded {:.2} of payment {} ({})",
            refund_amount, payment_id, reason
        );

        self.refresh_member_financials(&member, today).await?;

        Ok(refund)
    }

    /// Summary figures for a date window
    pub async fn summary(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<PaymentSummary> {
        let total_revenue = self
            .payment_repo
            .revenue_between(start, end)
            .await
            .map_err(AppError::from)?;

        let revenue_by_type = self
            .payment_repo
            .revenue_by_type(start, end)
            .await
            .map_err(AppError::from)?;

        let revenue_by_method = self
            .payment_repo
            .revenue_by_method(start, end)
            .await
            .map_err(AppError::from)?;

        let today = Utc::now().date_naive();
        let window_start = start.unwrap_or(today - chrono::Duration::days(365));
        let window_end = end.unwrap_or(today);
        let daily_revenue = self
            .payment_repo
            .revenue_by_period(window_start, window_end, false)
            .await
            .map_err(AppError::from)?;

        Ok(PaymentSummary {
            total_revenue,
            revenue_by_type,
            revenue_by_method,
            daily_revenue,
        })
    }

    /// The class-fee payment already recorded for an attendance, if any
    pub async fn payment_for_attendance(
        &self,
        attendance_id: Uuid,
    ) -> AppResult<Option<Payment>> {
        self.payment_repo
            .find_by_attendance(attendance_id)
            .await
            .map_err(AppError::from)
    }

    /// A member's payment history
    pub async fn member_history(&self, member_id: Uuid, limit: i64) -> AppResult<Vec<Payment>> {
        self.require_member(member_id).await?;
        self.payment_repo
            .find_by_member(member_id, limit)
            .await
            .map_err(AppError::from)
    }

    /// Sequential receipt number from the completed-payment count
    async fn next_receipt_number(&self) -> AppResult<String> {
        let count = self
            .payment_repo
            .count_completed()
            .await
            .map_err(AppError::from)?;
        Ok(format!("RCP-{:06}", count + 1))
    }

    /// Recompute the paying member's rollups after any ledger change
    async fn refresh_member_financials(&self, member: &Member, today: NaiveDate) -> AppResult<()> {
        let total_paid = self
            .payment_repo
            .total_completed_for_member(member.id)
            .await
            .map_err(AppError::from)?;

        let outstanding = if member.monthly_fee > 0.0 {
            let expected = member.monthly_fee * member.months_since_joining(today) as f64;
            (expected - total_paid).max(0.0)
        } else {
            0.0
        };

        let mut refreshed = member.clone();
        refreshed.total_paid = total_paid;
        refreshed.outstanding_amount = outstanding;
        let standing = refreshed.derive_payment_standing(today);

        self.member_repo
            .update_financials(member.id, total_paid, outstanding, standing.as_str())
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    /// Post the balanced double-entry legs for a completed payment: the cash
    /// or clearing account receives the net amount, income is credited the
    /// gross amount, and any processing fee lands on the expense account.
    /// Failures are logged, never propagated.
    async fn post_ledger_entries(
        &self,
        payment: &Payment,
        payment_type: PaymentType,
        payment_method: PaymentMethod,
    ) {
        let mut legs = vec![
            LedgerLeg::debit(payment_method.cash_account(), payment.net_amount),
            LedgerLeg::credit(payment_type.income_account(), payment.amount),
        ];

        if payment.processing_fee > 0.0 {
            legs.push(LedgerLeg::debit(
                "Payment Processing Fees",
                payment.processing_fee,
            ));
        }

        if !legs_balance(&legs) {
            warn!(
                "Unbalanced ledger legs for payment {}, skipping posting",
                payment.id
            );
            return;
        }

        let remark = format!(
            "Payment {} ({})",
            payment.id,
            payment.description.as_deref().unwrap_or("")
        );

        match self
            .ledger_repo
            .post_entry(payment.payment_date, Some(&remark), &legs)
            .await
        {
            Ok(entry) => {
                if let Err(e) = self
                    .payment_repo
                    .set_journal_entry(payment.id, entry.id)
                    .await
                {
                    warn!(
                        "Failed to link journal entry {} to payment {}: {}",
                        entry.id, payment.id, e
                    );
                }
            }
            Err(e) => {
                warn!(
                    "Failed to create accounting entry for payment {}: {}",
                    payment.id, e
                );
            }
        }
    }

    async fn require_member(&self, member_id: Uuid) -> AppResult<Member> {
        self.member_repo
            .find_by_id(member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))
    }
}
