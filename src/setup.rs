//! One-time provisioning: roles, the chart of accounts and notification
//! templates. Every insert is idempotent, so this runs on each startup.

use crate::models::AccountType;
use sqlx::SqlitePool;
use tracing::info;

/// Seed baseline records after migrations
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_roles(pool).await?;
    create_accounts(pool).await?;
    create_notification_templates(pool).await?;
    info!("Provisioning complete");
    Ok(())
}

async fn create_roles(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let roles = [
        ("Dojo Manager", 1),
        ("Dojo Instructor", 1),
        ("Dojo Staff", 1),
        ("Dojo Member", 0),
    ];

    for (role_name, desk_access) in roles {
        sqlx::query("INSERT OR IGNORE INTO roles (role_name, desk_access) VALUES (?1, ?2)")
            .bind(role_name)
            .bind(desk_access)
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_accounts(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let accounts = [
        ("Cash", AccountType::Cash),
        ("Bank", AccountType::Bank),
        ("Credit Card Clearing", AccountType::Clearing),
        ("PayPal", AccountType::Clearing),
        ("Stripe", AccountType::Clearing),
        ("Membership Income", AccountType::Income),
        ("Class Fee Income", AccountType::Income),
        ("Private Lesson Income", AccountType::Income),
        ("Seminar Income", AccountType::Income),
        ("Merchandise Sales", AccountType::Income),
        ("Registration Income", AccountType::Income),
        ("Late Fee Income", AccountType::Income),
        ("Other Income", AccountType::Income),
        ("Payment Processing Fees", AccountType::Expense),
    ];

    for (name, account_type) in accounts {
        sqlx::query("INSERT OR IGNORE INTO accounts (name, account_type) VALUES (?1, ?2)")
            .bind(name)
            .bind(account_type.as_str())
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_notification_templates(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let templates = [
        (
            "welcome_new_member",
            "Welcome to {{dojo_name}}!",
            "Dear {{member_name}},\n\n\
             Welcome to {{dojo_name}}! We're excited to have you join our Brazilian \
             Jiu-Jitsu family.\n\n\
             A few things for your first classes: arrive 15 minutes early, bring a \
             water bottle and towel, and wear comfortable athletic clothing. We'll \
             provide a loaner gi for your first few classes.\n\n\
             See you on the mats!\n{{dojo_name}} Team",
        ),
        (
            "belt_promotion_congratulations",
            "Congratulations on your {{to_belt}} Belt!",
            "Dear {{member_name}},\n\n\
             Congratulations on your promotion to {{to_belt}} belt!\n\n\
             This achievement represents your dedication, hard work and growth in \
             Brazilian Jiu-Jitsu. Your promotion from {{from_belt}} to {{to_belt}} \
             belt on {{promotion_date}} is well-deserved.\n\n\
             {{instructor}} notes: {{notes}}\n\n\
             Congratulations again!\n{{dojo_name}} Team",
        ),
        (
            "payment_receipt",
            "Payment Receipt - {{receipt_number}}",
            "Dear {{member_name}},\n\n\
             Thank you for your payment. Here are the details:\n\n\
             Receipt Number: {{receipt_number}}\n\
             Payment Type: {{payment_type}}\n\
             Amount: ${{amount}}\n\
             Payment Date: {{payment_date}}\n\
             Payment Method: {{payment_method}}\n\n\
             Thank you for being part of {{dojo_name}}!\n{{dojo_name}} Team",
        ),
        (
            "class_reminder",
            "Class Reminder: {{class_name}}",
            "Dear {{member_name}},\n\n\
             This is a reminder about your upcoming class:\n\n\
             {{class_name}}\n\
             Date: {{class_date}}\n\
             Time: {{start_time}}\n\
             Instructor: {{instructor}}\n\
             Location: {{location}}\n\n\
             We look forward to seeing you on the mats!\n{{dojo_name}} Team",
        ),
    ];

    for (name, subject, body) in templates {
        sqlx::query(
            "INSERT OR IGNORE INTO notification_templates (name, subject, body) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(subject)
        .bind(body)
        .execute(pool)
        .await?;
    }

    Ok(())
}
