//! Shared types for the reconciler.

use remittance::msg::TransferResponse;
use remittance::TransferStatus;
use serde::{Deserialize, Serialize};

/// Transfer status as tracked in the cache.
///
/// `Pending` rows are refreshed on every poll; `Completed` and `Cancelled`
/// are terminal and never polled again. A terminal row is never rewritten
/// back to `Pending`, regardless of what a (possibly stale) read reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Pending,
    Completed,
    Cancelled,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Pending => "pending",
            CacheStatus::Completed => "completed",
            CacheStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CacheStatus::Pending),
            "completed" => Some(CacheStatus::Completed),
            "cancelled" => Some(CacheStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CacheStatus::Pending)
    }

    /// Whether a cached row at `self` may be overwritten with `next`.
    /// Statuses only move forward: pending -> terminal, never back.
    pub fn may_advance_to(&self, next: CacheStatus) -> bool {
        match (self, next) {
            (a, b) if *a == b => true,
            (CacheStatus::Pending, _) => true,
            _ => false,
        }
    }
}

impl From<TransferStatus> for CacheStatus {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Pending => CacheStatus::Pending,
            TransferStatus::Completed => CacheStatus::Completed,
            TransferStatus::Cancelled => CacheStatus::Cancelled,
        }
    }
}

/// A point-in-time view of one on-chain transfer, as fed to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSnapshot {
    pub id: u64,
    pub sender: String,
    pub recipient: String,
    /// Base-10 integer string; stored as NUMERIC in the database.
    pub amount: String,
    pub fee: String,
    pub status: CacheStatus,
    pub created_height: u64,
    pub completed_height: Option<u64>,
    pub cancelled_height: Option<u64>,
}

impl From<TransferResponse> for TransferSnapshot {
    fn from(t: TransferResponse) -> Self {
        TransferSnapshot {
            id: t.id,
            sender: t.sender.to_string(),
            recipient: t.recipient.to_string(),
            amount: t.amount.to_string(),
            fee: t.fee.to_string(),
            status: t.status.into(),
            created_height: t.created_at,
            completed_height: t.completed_at,
            cancelled_height: t.cancelled_at,
        }
    }
}
