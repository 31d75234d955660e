//! Reconciliation between the on-chain registry and the Postgres cache.
//!
//! Two write paths feed the cache:
//! - [`record_submitted`]: an optimistic write made right after a transfer
//!   transaction is accepted, so reads reflect it before the next poll.
//! - [`Reconciler::run`]: the polling loop, which discovers transfers the
//!   optimistic path missed and refreshes every non-terminal row from the
//!   chain. Chain reads are authoritative; the only thing a poll never
//!   does is move a terminal row back to pending.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::db::{self, UpsertOutcome};
use crate::registry::TransferSource;
use crate::types::TransferSnapshot;

/// Retry configuration for chain reads
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential growth
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            ..Self::default()
        }
    }

    /// Calculate backoff duration for a given attempt (0-indexed)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped = backoff_secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Check if we should retry based on attempt count
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Record a transfer into the cache immediately after submission.
///
/// The next poll will confirm (or correct) this row from the chain, so a
/// lost optimistic write costs nothing but latency.
pub async fn record_submitted(pool: &PgPool, snapshot: &TransferSnapshot) -> Result<UpsertOutcome> {
    let outcome = db::upsert_transfer(pool, snapshot).await?;
    debug!(
        transfer_id = snapshot.id,
        was_new = outcome.was_new,
        "Recorded submitted transfer"
    );
    Ok(outcome)
}

/// The polling reconciler
pub struct Reconciler<S: TransferSource> {
    db: PgPool,
    source: Arc<S>,
    poll_interval: Duration,
    retry: RetryConfig,
}

impl<S: TransferSource> Reconciler<S> {
    pub fn new(db: PgPool, source: Arc<S>, poll_interval: Duration, retry: RetryConfig) -> Self {
        Self {
            db,
            source,
            poll_interval,
            retry,
        }
    }

    /// Run the polling loop until a shutdown signal arrives
    pub async fn run(&mut self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Reconciler started"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Reconciler shutting down");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.poll_interval) => {
                    if let Err(e) = self.sync_once().await {
                        warn!(error = %e, "Sync pass failed; will retry next interval");
                    }
                }
            }
        }
    }

    /// One full pass: discover new transfers, then refresh unresolved ones.
    pub async fn sync_once(&self) -> Result<()> {
        self.discover_new().await?;
        self.refresh_unresolved().await?;
        Ok(())
    }

    /// Pull in transfers with ids beyond the cache's high-water mark
    async fn discover_new(&self) -> Result<()> {
        let source = Arc::clone(&self.source);
        let count = self
            .fetch_with_retry(move || {
                let source = Arc::clone(&source);
                async move { source.transfer_count().await }
            })
            .await?;
        let watermark = db::max_transfer_id(&self.db).await?;

        if count <= watermark {
            return Ok(());
        }

        debug!(watermark, chain_count = count, "Discovering new transfers");

        for id in (watermark + 1)..=count {
            let source = Arc::clone(&self.source);
            let snapshot = self
                .fetch_with_retry(move || {
                    let source = Arc::clone(&source);
                    async move { source.transfer(id).await }
                })
                .await?;

            match snapshot {
                Some(snapshot) => {
                    let outcome = db::upsert_transfer(&self.db, &snapshot).await?;
                    if outcome.was_new {
                        info!(
                            transfer_id = id,
                            status = snapshot.status.as_str(),
                            "Discovered transfer"
                        );
                        // A transfer first seen already settled never
                        // enters the refresh path; its rollups are due
                        // right here
                        if snapshot.status.is_terminal() {
                            db::recompute_account_totals(&self.db, &snapshot.sender).await?;
                            db::recompute_account_totals(&self.db, &snapshot.recipient).await?;
                        }
                    }
                }
                // The count says this id exists; a missing read is a
                // stale or inconsistent node, not a fatal condition.
                None => warn!(transfer_id = id, "Transfer missing from chain read"),
            }
        }

        Ok(())
    }

    /// Re-read every cached pending transfer from the chain
    async fn refresh_unresolved(&self) -> Result<()> {
        let ids = db::get_unresolved_ids(&self.db).await?;

        for id in ids {
            let source = Arc::clone(&self.source);
            let snapshot = self
                .fetch_with_retry(move || {
                    let source = Arc::clone(&source);
                    async move { source.transfer(id).await }
                })
                .await?;

            let Some(snapshot) = snapshot else {
                warn!(transfer_id = id, "Cached transfer missing from chain read");
                continue;
            };

            let outcome = db::upsert_transfer(&self.db, &snapshot).await?;
            if outcome.status_changed {
                info!(
                    transfer_id = id,
                    from = outcome
                        .previous_status
                        .map(|s| s.as_str())
                        .unwrap_or("unknown"),
                    to = snapshot.status.as_str(),
                    "Transfer status changed"
                );

                // Terminal settlement affects both parties' rollups
                if snapshot.status.is_terminal() {
                    db::recompute_account_totals(&self.db, &snapshot.sender).await?;
                    db::recompute_account_totals(&self.db, &snapshot.recipient).await?;
                }
            }
        }

        Ok(())
    }

    /// Run a chain read with exponential backoff
    async fn fetch_with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.retry.should_retry(attempt) => {
                    let backoff = self.retry.backoff_for_attempt(attempt);
                    warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Chain read failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
