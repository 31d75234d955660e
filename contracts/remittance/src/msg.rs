//! Message types for the remittance contract.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use crate::escrow::EscrowStatus;
use crate::state::TransferStatus;

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for fee/pause policy changes
    pub admin: String,
    /// Initial fee rate in basis points (0..=10000)
    pub fee_bps: u64,
    /// Address receiving fees from completed transfers
    pub fee_collector: String,
    /// Native denom this ledger handles (e.g. "uluna")
    pub denom: String,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    /// Lock funds for a recipient, creating a pending transfer.
    ///
    /// Authorization: anyone. The sender must attach at least
    /// `amount + fee` of the configured denom; any surplus is returned.
    /// Returns the assigned transfer id in the `transfer_id` attribute and
    /// response data.
    InitiateTransfer {
        /// Recipient address (must differ from the caller)
        recipient: String,
        /// Principal amount to transfer
        amount: Uint128,
    },

    /// Claim a pending transfer.
    ///
    /// Authorization: recipient only. Pays out exactly `amount` to the
    /// recipient and forwards the fee to the fee collector.
    CompleteTransfer {
        /// Transfer id
        id: u64,
    },

    /// Reclaim a pending transfer.
    ///
    /// Authorization: sender only. Returns the full `amount + fee` to the
    /// sender; the fee reservation is refunded, not collected.
    CancelTransfer {
        /// Transfer id
        id: u64,
    },

    /// Set the fee rate for transfers initiated afterward.
    ///
    /// Authorization: admin only. Stored fees of existing transfers are
    /// never altered.
    SetFeeRate {
        /// New rate in basis points (0..=10000)
        fee_bps: u64,
    },

    /// Block new transfers (admin only).
    ///
    /// Completion and cancellation of pending transfers keep working while
    /// paused, so locked funds always remain recoverable.
    PauseContract {},

    /// Resume new transfers (admin only)
    UnpauseContract {},
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns a transfer by id
    #[returns(Option<TransferResponse>)]
    Transfer { id: u64 },

    /// Returns transfers with cursor-based pagination, ascending by id
    #[returns(TransfersResponse)]
    Transfers {
        /// Cursor: the id of the last item from the previous page
        start_after: Option<u64>,
        /// Max entries to return (default 10, max 50)
        limit: Option<u32>,
    },

    /// Returns just the status string of a transfer
    #[returns(TransferStatusResponse)]
    TransferStatus { id: u64 },

    /// Returns the total number of transfers ever created
    #[returns(TransferCountResponse)]
    TransferCount {},

    /// Returns the current fee rate in basis points
    #[returns(FeeRateResponse)]
    FeeRate {},

    /// Returns whether new transfers are blocked
    #[returns(PausedStatusResponse)]
    PausedStatus {},

    /// Returns aggregate statistics
    #[returns(StatsResponse)]
    Stats {},

    /// Returns the escrow record for a transfer
    #[returns(Option<EscrowInfoResponse>)]
    EscrowInfo { id: u64 },

    /// Returns the sum of currently locked escrow amounts where the account
    /// is sender or recipient
    #[returns(EscrowBalanceResponse)]
    EscrowBalance { account: String },

    /// Previews the fee for an amount at the current rate
    #[returns(CalculateFeeResponse)]
    CalculateFee { amount: Uint128 },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub fee_bps: u64,
    pub fee_collector: Addr,
    pub denom: String,
}

#[cw_serde]
pub struct TransferResponse {
    pub id: u64,
    pub sender: Addr,
    pub recipient: Addr,
    pub amount: Uint128,
    pub fee: Uint128,
    pub status: TransferStatus,
    pub created_at: u64,
    pub completed_at: Option<u64>,
    pub cancelled_at: Option<u64>,
}

#[cw_serde]
pub struct TransfersResponse {
    pub transfers: Vec<TransferResponse>,
}

#[cw_serde]
pub struct TransferStatusResponse {
    /// `None` when the transfer does not exist
    pub status: Option<TransferStatus>,
}

#[cw_serde]
pub struct TransferCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct FeeRateResponse {
    pub fee_bps: u64,
}

#[cw_serde]
pub struct PausedStatusResponse {
    pub paused: bool,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_transfers: u64,
    pub total_completed: u64,
    pub total_cancelled: u64,
    pub total_fees_collected: Uint128,
}

#[cw_serde]
pub struct EscrowInfoResponse {
    pub sender: Addr,
    pub recipient: Addr,
    pub amount: Uint128,
    pub locked_at: u64,
    pub status: EscrowStatus,
}

#[cw_serde]
pub struct EscrowBalanceResponse {
    pub account: Addr,
    pub balance: Uint128,
}

#[cw_serde]
pub struct CalculateFeeResponse {
    pub fee_bps: u64,
    pub fee: Uint128,
    /// Amount + fee: what the sender must attach
    pub total: Uint128,
}
