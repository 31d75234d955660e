//! Fee & pause policy handlers (admin only).
//!
//! Pause blocks only `InitiateTransfer`; completion and cancellation of
//! already-pending transfers keep working while paused, so users can always
//! recover locked funds.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::error::ContractError;
use crate::state::{CONFIG, MAX_FEE_BPS};

/// Set the fee rate for transfers initiated afterward. Stored fees of
/// existing transfers are never altered.
pub fn execute_set_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    fee_bps: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    if fee_bps > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeeRate { bps: fee_bps });
    }

    config.fee_bps = fee_bps;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_fee_rate")
        .add_attribute("fee_bps", fee_bps.to_string()))
}

/// Pause the contract (blocks new transfers).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause_contract"))
}

/// Unpause the contract (resumes new transfers).
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause_contract"))
}
