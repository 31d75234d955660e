#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::CacheStatus;

// Note: amount fields are String to avoid BigDecimal/sqlx version conflicts.
// The database stores them as NUMERIC(39,0). When inserting we cast text to
// NUMERIC in the SQL query ($N::NUMERIC); when reading we select amount::TEXT.

/// A cached transfer row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CachedTransfer {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub fee: String,
    pub status: String,
    pub created_height: i64,
    pub completed_height: Option<i64>,
    pub cancelled_height: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CachedTransfer {
    pub fn cache_status(&self) -> Option<CacheStatus> {
        CacheStatus::parse(&self.status)
    }
}

/// Per-account rollup of completed transfers
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccountTotals {
    pub account: String,
    pub total_sent: String,
    pub total_received: String,
    pub completed_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Result of writing a snapshot into the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// True when no row existed for this id before the write
    pub was_new: bool,
    /// True when the stored status actually changed
    pub status_changed: bool,
    /// The status the row held before the write, if it existed
    pub previous_status: Option<CacheStatus>,
}
