//! Remittance Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `escrow` - Escrow vault sub-ledger

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_cancel_transfer, execute_complete_transfer, execute_initiate_transfer, execute_pause,
    execute_set_fee_rate, execute_unpause,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_calculate_fee, query_config, query_escrow_balance, query_escrow_info, query_fee_rate,
    query_paused_status, query_stats, query_transfer, query_transfer_count, query_transfer_status,
    query_transfers,
};
use crate::state::{
    Config, Stats, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MAX_FEE_BPS, STATS, TRANSFER_COUNT,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let fee_collector = deps.api.addr_validate(&msg.fee_collector)?;

    if msg.fee_bps > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeeRate { bps: msg.fee_bps });
    }

    let config = Config {
        admin,
        paused: false,
        fee_bps: msg.fee_bps,
        fee_collector,
        denom: msg.denom,
    };
    CONFIG.save(deps.storage, &config)?;

    TRANSFER_COUNT.save(deps.storage, &0u64)?;

    let stats = Stats {
        total_transfers: 0,
        total_completed: 0,
        total_cancelled: 0,
        total_fees_collected: Uint128::zero(),
    };
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("fee_bps", config.fee_bps.to_string())
        .add_attribute("denom", config.denom))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Transfer lifecycle
        ExecuteMsg::InitiateTransfer { recipient, amount } => {
            execute_initiate_transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::CompleteTransfer { id } => execute_complete_transfer(deps, env, info, id),
        ExecuteMsg::CancelTransfer { id } => execute_cancel_transfer(deps, env, info, id),

        // Fee & pause policy
        ExecuteMsg::SetFeeRate { fee_bps } => execute_set_fee_rate(deps, info, fee_bps),
        ExecuteMsg::PauseContract {} => execute_pause(deps, info),
        ExecuteMsg::UnpauseContract {} => execute_unpause(deps, info),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Transfer { id } => to_json_binary(&query_transfer(deps, id)?),
        QueryMsg::Transfers { start_after, limit } => {
            to_json_binary(&query_transfers(deps, start_after, limit)?)
        }
        QueryMsg::TransferStatus { id } => to_json_binary(&query_transfer_status(deps, id)?),
        QueryMsg::TransferCount {} => to_json_binary(&query_transfer_count(deps)?),
        QueryMsg::FeeRate {} => to_json_binary(&query_fee_rate(deps)?),
        QueryMsg::PausedStatus {} => to_json_binary(&query_paused_status(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::EscrowInfo { id } => to_json_binary(&query_escrow_info(deps, id)?),
        QueryMsg::EscrowBalance { account } => {
            to_json_binary(&query_escrow_balance(deps, account)?)
        }
        QueryMsg::CalculateFee { amount } => to_json_binary(&query_calculate_fee(deps, amount)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
