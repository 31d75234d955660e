//! Query handlers for the remittance contract.
//!
//! All queries are side-effect free and observe the committed snapshot of
//! the most recent write; there is no partially-applied transition visible.

use cosmwasm_std::{Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::escrow;
use crate::msg::{
    CalculateFeeResponse, ConfigResponse, EscrowBalanceResponse, EscrowInfoResponse,
    FeeRateResponse, PausedStatusResponse, StatsResponse, TransferCountResponse, TransferResponse,
    TransferStatusResponse, TransfersResponse,
};
use crate::state::{Transfer, BPS_DENOMINATOR, CONFIG, STATS, TRANSFERS, TRANSFER_COUNT};

fn transfer_response(transfer: Transfer) -> TransferResponse {
    TransferResponse {
        id: transfer.id,
        sender: transfer.sender,
        recipient: transfer.recipient,
        amount: transfer.amount,
        fee: transfer.fee,
        status: transfer.status,
        created_at: transfer.created_at,
        completed_at: transfer.completed_at,
        cancelled_at: transfer.cancelled_at,
    }
}

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        fee_bps: config.fee_bps,
        fee_collector: config.fee_collector,
        denom: config.denom,
    })
}

/// Query a transfer by id.
pub fn query_transfer(deps: Deps, id: u64) -> StdResult<Option<TransferResponse>> {
    Ok(TRANSFERS.may_load(deps.storage, id)?.map(transfer_response))
}

/// Query a paginated list of transfers, ascending by id.
pub fn query_transfers(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TransfersResponse> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after.map(Bound::exclusive);

    let transfers = TRANSFERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, transfer) = item?;
            Ok(transfer_response(transfer))
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TransfersResponse { transfers })
}

/// Query the status of a transfer; `None` if it does not exist.
pub fn query_transfer_status(deps: Deps, id: u64) -> StdResult<TransferStatusResponse> {
    let status = TRANSFERS
        .may_load(deps.storage, id)?
        .map(|transfer| transfer.status);
    Ok(TransferStatusResponse { status })
}

/// Query the total number of transfers ever created.
pub fn query_transfer_count(deps: Deps) -> StdResult<TransferCountResponse> {
    let count = TRANSFER_COUNT.load(deps.storage)?;
    Ok(TransferCountResponse { count })
}

/// Query the current fee rate.
pub fn query_fee_rate(deps: Deps) -> StdResult<FeeRateResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(FeeRateResponse {
        fee_bps: config.fee_bps,
    })
}

/// Query the paused flag.
pub fn query_paused_status(deps: Deps) -> StdResult<PausedStatusResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(PausedStatusResponse {
        paused: config.paused,
    })
}

/// Query aggregate statistics.
pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        total_transfers: stats.total_transfers,
        total_completed: stats.total_completed,
        total_cancelled: stats.total_cancelled,
        total_fees_collected: stats.total_fees_collected,
    })
}

/// Query the escrow record for a transfer.
pub fn query_escrow_info(deps: Deps, id: u64) -> StdResult<Option<EscrowInfoResponse>> {
    Ok(escrow::escrow_info(deps.storage, id)?.map(|record| EscrowInfoResponse {
        sender: record.sender,
        recipient: record.recipient,
        amount: record.amount,
        locked_at: record.locked_at,
        status: record.status,
    }))
}

/// Query the locked escrow balance for an account.
pub fn query_escrow_balance(deps: Deps, account: String) -> StdResult<EscrowBalanceResponse> {
    let account = deps.api.addr_validate(&account)?;
    let balance = escrow::escrow_balance(deps.storage, &account)?;
    Ok(EscrowBalanceResponse { account, balance })
}

/// Preview the fee for an amount at the current rate.
pub fn query_calculate_fee(deps: Deps, amount: Uint128) -> StdResult<CalculateFeeResponse> {
    let config = CONFIG.load(deps.storage)?;
    let fee = amount.multiply_ratio(config.fee_bps as u128, BPS_DENOMINATOR);
    let total = amount.checked_add(fee).map_err(StdError::overflow)?;
    Ok(CalculateFeeResponse {
        fee_bps: config.fee_bps,
        fee,
        total,
    })
}
