//! Postgres cache access.
//!
//! The cache holds one row per on-chain transfer, keyed by the chain's
//! transfer id. All writes go through [`upsert_transfer`], which is
//! idempotent and enforces forward-only status movement.

#![allow(dead_code)]

use eyre::{Result, WrapErr};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::error;

pub mod models;

pub use models::*;

use crate::types::{CacheStatus, TransferSnapshot};

const TRANSFER_COLUMNS: &str = "id, sender, recipient, amount::TEXT as amount, fee::TEXT as fee, \
     status, created_height, completed_height, cancelled_height, created_at, updated_at";

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to database")
}

/// Run pending migrations (uses the migration files in migrations/)
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .wrap_err("Failed to run database migrations")?;
    Ok(())
}

/// Write a transfer snapshot into the cache.
///
/// Idempotent on the transfer id. The existing row is locked for the
/// duration of the write, so concurrent observers of the same transfer
/// serialize here. A terminal row is never regressed to pending; writing
/// an identical snapshot is a no-op apart from `updated_at`.
pub async fn upsert_transfer(pool: &PgPool, snapshot: &TransferSnapshot) -> Result<UpsertOutcome> {
    let mut tx = pool.begin().await.wrap_err("Failed to begin transaction")?;

    let existing = sqlx::query("SELECT status FROM transfers WHERE id = $1 FOR UPDATE")
        .bind(snapshot.id as i64)
        .fetch_optional(&mut *tx)
        .await
        .wrap_err("Failed to read existing transfer row")?;

    let outcome = match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO transfers (id, sender, recipient, amount, fee, status,
                    created_height, completed_height, cancelled_height)
                VALUES ($1, $2, $3, $4::NUMERIC, $5::NUMERIC, $6, $7, $8, $9)
                "#,
            )
            .bind(snapshot.id as i64)
            .bind(&snapshot.sender)
            .bind(&snapshot.recipient)
            .bind(&snapshot.amount)
            .bind(&snapshot.fee)
            .bind(snapshot.status.as_str())
            .bind(snapshot.created_height as i64)
            .bind(snapshot.completed_height.map(|h| h as i64))
            .bind(snapshot.cancelled_height.map(|h| h as i64))
            .execute(&mut *tx)
            .await
            .wrap_err("Failed to insert transfer row")?;

            UpsertOutcome {
                was_new: true,
                status_changed: false,
                previous_status: None,
            }
        }
        Some(row) => {
            let previous: String = row.get("status");
            let previous = CacheStatus::parse(&previous);

            let advance = match previous {
                Some(prev) => prev.may_advance_to(snapshot.status),
                // Unparseable status in the row: let the chain view win
                None => true,
            };

            if advance {
                sqlx::query(
                    r#"
                    UPDATE transfers
                    SET status = $2, completed_height = $3, cancelled_height = $4,
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(snapshot.id as i64)
                .bind(snapshot.status.as_str())
                .bind(snapshot.completed_height.map(|h| h as i64))
                .bind(snapshot.cancelled_height.map(|h| h as i64))
                .execute(&mut *tx)
                .await
                .wrap_err("Failed to update transfer row")?;
            }

            UpsertOutcome {
                was_new: false,
                status_changed: advance && previous != Some(snapshot.status),
                previous_status: previous,
            }
        }
    };

    tx.commit().await.wrap_err("Failed to commit transfer upsert")?;
    Ok(outcome)
}

/// Get one cached transfer by id
pub async fn get_transfer(pool: &PgPool, id: u64) -> Result<Option<CachedTransfer>> {
    let row = sqlx::query_as::<_, CachedTransfer>(&format!(
        "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE id = $1"
    ))
    .bind(id as i64)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to get transfer")?;

    Ok(row)
}

/// Transfers where the account is sender or recipient, newest first.
/// Optionally filtered by status and capped at `limit` rows.
pub async fn get_transfers_for_account(
    pool: &PgPool,
    account: &str,
    status: Option<CacheStatus>,
    limit: Option<i64>,
) -> Result<Vec<CachedTransfer>> {
    let rows = sqlx::query_as::<_, CachedTransfer>(&format!(
        "SELECT {TRANSFER_COLUMNS} FROM transfers
         WHERE (sender = $1 OR recipient = $1)
           AND ($2::TEXT IS NULL OR status = $2)
         ORDER BY id DESC
         LIMIT $3"
    ))
    .bind(account)
    .bind(status.map(|s| s.as_str()))
    .bind(limit.unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!("SQL error getting transfers for account: {:?}", e);
        e
    })
    .wrap_err("Failed to get transfers for account")?;

    Ok(rows)
}

/// All transfers in a given status, ascending by id
pub async fn get_transfers_by_status(
    pool: &PgPool,
    status: CacheStatus,
) -> Result<Vec<CachedTransfer>> {
    let rows = sqlx::query_as::<_, CachedTransfer>(&format!(
        "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE status = $1 ORDER BY id"
    ))
    .bind(status.as_str())
    .fetch_all(pool)
    .await
    .wrap_err("Failed to get transfers by status")?;

    Ok(rows)
}

/// Transfers pending claim by a given recipient
pub async fn get_pending_for_recipient(
    pool: &PgPool,
    recipient: &str,
) -> Result<Vec<CachedTransfer>> {
    let rows = sqlx::query_as::<_, CachedTransfer>(&format!(
        "SELECT {TRANSFER_COLUMNS} FROM transfers
         WHERE recipient = $1 AND status = 'pending'
         ORDER BY id"
    ))
    .bind(recipient)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to get pending transfers for recipient")?;

    Ok(rows)
}

/// Ids of all cached rows that are not yet terminal
pub async fn get_unresolved_ids(pool: &PgPool) -> Result<Vec<u64>> {
    let rows = sqlx::query("SELECT id FROM transfers WHERE status = 'pending' ORDER BY id")
        .fetch_all(pool)
        .await
        .wrap_err("Failed to get unresolved transfer ids")?;

    Ok(rows
        .into_iter()
        .map(|row| row.get::<i64, _>("id") as u64)
        .collect())
}

/// Highest transfer id present in the cache (0 when empty)
pub async fn max_transfer_id(pool: &PgPool) -> Result<u64> {
    let row = sqlx::query("SELECT COALESCE(MAX(id), 0) AS max_id FROM transfers")
        .fetch_one(pool)
        .await
        .wrap_err("Failed to get max transfer id")?;

    Ok(row.get::<i64, _>("max_id") as u64)
}

/// Read the stored rollup for one account, if any
pub async fn get_account_totals(pool: &PgPool, account: &str) -> Result<Option<AccountTotals>> {
    let row = sqlx::query_as::<_, AccountTotals>(
        "SELECT account, total_sent::TEXT as total_sent,
                total_received::TEXT as total_received, completed_count, updated_at
         FROM account_totals WHERE account = $1",
    )
    .bind(account)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to get account totals")?;

    Ok(row)
}

/// Recompute the completed-transfer rollup for one account from the cache.
/// Derived entirely from transfer rows, so it is safe to call at any time.
pub async fn recompute_account_totals(pool: &PgPool, account: &str) -> Result<AccountTotals> {
    let row = sqlx::query(
        r#"
        INSERT INTO account_totals (account, total_sent, total_received, completed_count, updated_at)
        SELECT $1,
               COALESCE(SUM(amount) FILTER (WHERE sender = $1), 0),
               COALESCE(SUM(amount) FILTER (WHERE recipient = $1), 0),
               COUNT(*),
               NOW()
        FROM transfers
        WHERE status = 'completed' AND (sender = $1 OR recipient = $1)
        ON CONFLICT (account) DO UPDATE
        SET total_sent = EXCLUDED.total_sent,
            total_received = EXCLUDED.total_received,
            completed_count = EXCLUDED.completed_count,
            updated_at = EXCLUDED.updated_at
        RETURNING account, total_sent::TEXT as total_sent,
                  total_received::TEXT as total_received, completed_count, updated_at
        "#,
    )
    .bind(account)
    .fetch_one(pool)
    .await
    .wrap_err("Failed to recompute account totals")?;

    Ok(AccountTotals {
        account: row.get("account"),
        total_sent: row.get("total_sent"),
        total_received: row.get("total_received"),
        completed_count: row.get("completed_count"),
        updated_at: row.get("updated_at"),
    })
}
