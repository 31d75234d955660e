//! Transfer lifecycle handlers (initiate, complete, cancel).
//!
//! Every handler either commits the full transition (registry record,
//! escrow record, payout messages, stats) or fails without touching state;
//! the chain reverts storage on error, so a failed lock never leaves a
//! transfer record behind.

use cosmwasm_std::{
    to_json_binary, BankMsg, Coin, CosmosMsg, DepsMut, Env, MessageInfo, Response, StdError,
    Uint128,
};

use crate::error::ContractError;
use crate::escrow;
use crate::state::{Transfer, TransferStatus, BPS_DENOMINATOR, CONFIG, STATS, TRANSFERS, TRANSFER_COUNT};

/// Lock funds for a recipient and create a pending transfer.
pub fn execute_initiate_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::ContractPaused);
    }

    if amount.is_zero() {
        return Err(ContractError::AmountZero);
    }

    let recipient = deps.api.addr_validate(&recipient)?;
    if info.sender == recipient {
        return Err(ContractError::SenderRecipientSame);
    }

    // Fee is fixed here, at the rate in effect right now. Integer floor
    // division determines exact settlement amounts.
    let fee = amount.multiply_ratio(config.fee_bps as u128, BPS_DENOMINATOR);
    let required = amount.checked_add(fee).map_err(StdError::overflow)?;

    // The sender must attach amount + fee in the configured denom
    let attached: Uint128 = info
        .funds
        .iter()
        .filter(|coin| coin.denom == config.denom)
        .map(|coin| coin.amount)
        .sum();

    if attached < required {
        return Err(ContractError::InsufficientBalance {
            required,
            got: attached,
            denom: config.denom.clone(),
        });
    }

    // Return anything beyond amount + fee, plus any coins in a denom the
    // ledger does not handle, so no value is stranded in the contract
    let mut refund: Vec<Coin> = info
        .funds
        .iter()
        .filter(|coin| coin.denom != config.denom)
        .cloned()
        .collect();
    let surplus = attached - required;
    if !surplus.is_zero() {
        refund.push(Coin {
            denom: config.denom.clone(),
            amount: surplus,
        });
    }

    // Allocate the next id
    let id = TRANSFER_COUNT.load(deps.storage)? + 1;
    TRANSFER_COUNT.save(deps.storage, &id)?;

    escrow::lock(
        deps.storage,
        id,
        &info.sender,
        &recipient,
        amount,
        env.block.height,
    )?;

    let transfer = Transfer {
        id,
        sender: info.sender.clone(),
        recipient: recipient.clone(),
        amount,
        fee,
        status: TransferStatus::Pending,
        created_at: env.block.height,
        completed_at: None,
        cancelled_at: None,
    };
    TRANSFERS.save(deps.storage, id, &transfer)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_transfers += 1;
    STATS.save(deps.storage, &stats)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !refund.is_empty() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: refund,
        }));
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "initiate_transfer")
        .add_attribute("transfer_id", id.to_string())
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount.to_string())
        .add_attribute("fee", fee.to_string())
        .set_data(to_json_binary(&id)?))
}

/// Claim a pending transfer (recipient only).
pub fn execute_complete_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // A missing transfer reports the same code as an already-resolved one:
    // from the caller's perspective both are "not resolvable now"
    let mut transfer = TRANSFERS
        .may_load(deps.storage, id)?
        .ok_or(ContractError::InvalidTransferStatus)?;

    if info.sender != transfer.recipient {
        return Err(ContractError::Unauthorized);
    }

    if transfer.status != TransferStatus::Pending {
        return Err(ContractError::InvalidTransferStatus);
    }

    let record = escrow::release(deps.storage, id)?;

    transfer.status = TransferStatus::Completed;
    transfer.completed_at = Some(env.block.height);
    TRANSFERS.save(deps.storage, id, &transfer)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_completed += 1;
    stats.total_fees_collected += transfer.fee;
    STATS.save(deps.storage, &stats)?;

    // Recipient receives exactly `amount`; the fee reservation goes to the
    // collector
    let mut messages: Vec<CosmosMsg> = vec![CosmosMsg::Bank(BankMsg::Send {
        to_address: transfer.recipient.to_string(),
        amount: vec![Coin {
            denom: config.denom.clone(),
            amount: record.amount,
        }],
    })];
    if !transfer.fee.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: vec![Coin {
                denom: config.denom,
                amount: transfer.fee,
            }],
        }));
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "complete_transfer")
        .add_attribute("transfer_id", id.to_string())
        .add_attribute("recipient", transfer.recipient)
        .add_attribute("amount", record.amount.to_string())
        .add_attribute("fee", transfer.fee.to_string()))
}

/// Reclaim a pending transfer (sender only).
pub fn execute_cancel_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut transfer = TRANSFERS
        .may_load(deps.storage, id)?
        .ok_or(ContractError::InvalidTransferStatus)?;

    if info.sender != transfer.sender {
        return Err(ContractError::Unauthorized);
    }

    if transfer.status != TransferStatus::Pending {
        return Err(ContractError::InvalidTransferStatus);
    }

    let record = escrow::refund(deps.storage, id)?;

    transfer.status = TransferStatus::Cancelled;
    transfer.cancelled_at = Some(env.block.height);
    TRANSFERS.save(deps.storage, id, &transfer)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_cancelled += 1;
    STATS.save(deps.storage, &stats)?;

    // Full refund: principal plus the fee reservation
    let refund_amount = record.amount + transfer.fee;
    let messages = vec![CosmosMsg::Bank(BankMsg::Send {
        to_address: transfer.sender.to_string(),
        amount: vec![Coin {
            denom: config.denom,
            amount: refund_amount,
        }],
    })];

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "cancel_transfer")
        .add_attribute("transfer_id", id.to_string())
        .add_attribute("sender", transfer.sender)
        .add_attribute("refunded", refund_amount.to_string()))
}
