use crate::models::{Account, JournalEntry, JournalEntryLine, LedgerLeg};
use chrono::{NaiveDate, Utc};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

/// Repository for the chart of accounts and posted journal entries
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Create a new LedgerRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All accounts, alphabetically
    pub async fn list_accounts(&self) -> SqlxResult<Vec<Account>> {
        sqlx::query_as::<_, Account>("SELECT name, account_type FROM accounts ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Post a journal entry with its legs in one transaction
    pub async fn post_entry(
        &self,
        posting_date: NaiveDate,
        remark: Option<&str>,
        legs: &[LedgerLeg],
    ) -> SqlxResult<JournalEntry> {
        let entry_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        let mut tx = self.pool.begin().await?;

        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (id, posting_date, remark, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, posting_date, remark, created_at
            "#,
        )
        .bind(entry_id)
        .bind(posting_date)
        .bind(remark)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for leg in legs {
            sqlx::query(
                r#"
                INSERT INTO journal_entry_lines (id, journal_entry_id, account, debit, credit)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(entry_id)
            .bind(&leg.account)
            .bind(leg.debit)
            .bind(leg.credit)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(entry)
    }

    /// Find a journal entry by UUID
    pub async fn find_entry(&self, id: Uuid) -> SqlxResult<Option<JournalEntry>> {
        sqlx::query_as::<_, JournalEntry>(
            "SELECT id, posting_date, remark, created_at FROM journal_entries WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Legs of a journal entry
    pub async fn find_lines(&self, journal_entry_id: Uuid) -> SqlxResult<Vec<JournalEntryLine>> {
        sqlx::query_as::<_, JournalEntryLine>(
            r#"
            SELECT id, journal_entry_id, account, debit, credit
            FROM journal_entry_lines
            WHERE journal_entry_id = ?1
            ORDER BY debit DESC
            "#,
        )
        .bind(journal_entry_id)
        .fetch_all(&self.pool)
        .await
    }
}
