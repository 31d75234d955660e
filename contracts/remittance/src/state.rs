//! State definitions for the remittance contract.
//!
//! The escrow vault keeps its own storage in `crate::escrow`; this module
//! holds the transfer registry, the fee/pause policy, and aggregate stats.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration (fee & pause policy)
#[cw_serde]
pub struct Config {
    /// Admin address for policy changes
    pub admin: Addr,
    /// Whether new transfers are currently blocked
    pub paused: bool,
    /// Fee rate in basis points (100 = 1%, 10000 = 100%)
    pub fee_bps: u64,
    /// Address receiving fees from completed transfers
    pub fee_collector: Addr,
    /// Native denom this ledger handles (single fungible balance)
    pub denom: String,
}

// ============================================================================
// Transfer Registry
// ============================================================================

/// Lifecycle status of a transfer. `Pending` is the only non-terminal state.
#[cw_serde]
pub enum TransferStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Completed => "completed",
            TransferStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferStatus::Pending)
    }
}

/// Authoritative transfer record, one per id. Identity fields are immutable
/// after creation; only `status` and the resolution markers ever change.
#[cw_serde]
pub struct Transfer {
    /// Monotonically assigned unique id (starts at 1)
    pub id: u64,
    /// Account that locked the funds
    pub sender: Addr,
    /// Account entitled to claim the funds
    pub recipient: Addr,
    /// Principal amount, fixed at creation
    pub amount: Uint128,
    /// Fee computed once at creation from the rate in effect at that moment
    pub fee: Uint128,
    /// Current lifecycle status
    pub status: TransferStatus,
    /// Block height at creation
    pub created_at: u64,
    /// Block height of completion, set exactly once
    pub completed_at: Option<u64>,
    /// Block height of cancellation, set exactly once
    pub cancelled_at: Option<u64>,
}

/// Aggregate counters. `total_fees_collected` sums `fee` over completed
/// transfers only; cancelled transfers refund their fee reservation.
#[cw_serde]
pub struct Stats {
    pub total_transfers: u64,
    pub total_completed: u64,
    pub total_cancelled: u64,
    pub total_fees_collected: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:lumenda-remittance";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10000;

/// Maximum fee rate in basis points (100%)
pub const MAX_FEE_BPS: u64 = 10000;

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Total number of transfers ever created; the last assigned id
pub const TRANSFER_COUNT: Item<u64> = Item::new("transfer_count");

/// Transfer registry, keyed by id
pub const TRANSFERS: Map<u64, Transfer> = Map::new("transfers");

/// Aggregate statistics
pub const STATS: Item<Stats> = Item::new("stats");
