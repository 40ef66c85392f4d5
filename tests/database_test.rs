mod helpers;

use helpers::*;
use sqlx::{Row, SqlitePool};

// ============================================================================
// Connection Pool Tests
// ============================================================================

#[sqlx::test]
async fn test_connection_pool_creation(pool: SqlitePool) {
    let result = sqlx::query("SELECT 1 as test").fetch_one(&pool).await;

    assert!(result.is_ok());
    let row = result.unwrap();
    let value: i32 = row.get("test");
    assert_eq!(value, 1);
}

#[sqlx::test]
async fn test_connection_pool_multiple_queries(pool: SqlitePool) {
    for i in 1..=5 {
        let result = sqlx::query(&format!("SELECT {} as test", i))
            .fetch_one(&pool)
            .await;
        assert!(result.is_ok());
    }
}

// ============================================================================
// Migration Tests
// ============================================================================

#[sqlx::test]
async fn test_migrations_ran(pool: SqlitePool) {
    // Verify that all tables exist
    let tables = vec![
        "members",
        "classes",
        "attendance",
        "promotions",
        "payments",
        "accounts",
        "journal_entries",
        "journal_entry_lines",
        "roles",
        "notification_templates",
    ];

    for table in tables {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Schema query failed");

        assert_eq!(exists, 1, "Table {} should exist", table);
    }
}

#[sqlx::test]
async fn test_outstanding_amount_check_constraint(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;

    let member = create_test_member(&app, "Ana Souza", "ana@example.com").await;

    // The schema rejects a negative outstanding amount outright
    let result = sqlx::query("UPDATE members SET outstanding_amount = -5 WHERE id = ?1")
        .bind(member.id)
        .execute(&app.pool)
        .await;

    assert!(result.is_err());
}

#[sqlx::test]
async fn test_attendance_unique_index(pool: SqlitePool) {
    let app = TestApp::from_pool(pool).await;

    let indexed: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM sqlite_master
        WHERE type = 'index' AND tbl_name = 'attendance'
        "#,
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();

    // The UNIQUE (class_id, member_id) constraint materializes as an index
    assert!(indexed >= 1);
}
