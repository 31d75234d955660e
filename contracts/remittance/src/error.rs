//! Error types for the remittance contract.
//!
//! Every variant maps to a stable numeric code (see [`ContractError::code`]).
//! The codes are part of the external interface: clients map them to
//! human-readable messages, so they must never change between versions.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Transfer Registry Errors
    // ========================================================================

    #[error("Transfer not in required status (error 103)")]
    InvalidTransferStatus,

    #[error("Invalid fee rate: {bps} bps exceeds maximum 10000 (error 105)")]
    InvalidFeeRate { bps: u64 },

    #[error("Sender and recipient must differ (error 106)")]
    SenderRecipientSame,

    // ========================================================================
    // Escrow Vault Errors
    // ========================================================================

    #[error("No escrow record for transfer {id} (error 201)")]
    EscrowNotFound { id: u64 },

    #[error("Escrow for transfer {id} is not locked (error 202)")]
    EscrowNotLocked { id: u64 },

    #[error("Escrow record already exists for transfer {id} (error 203)")]
    DuplicateEscrow { id: u64 },

    // ========================================================================
    // Authorization & Policy Errors
    // ========================================================================

    #[error("Unauthorized (error 300)")]
    Unauthorized,

    #[error("Contract is paused (error 303)")]
    ContractPaused,

    // ========================================================================
    // Funds Errors
    // ========================================================================

    #[error("Insufficient funds: required {required} {denom}, got {got} (error 402)")]
    InsufficientBalance {
        required: Uint128,
        got: Uint128,
        denom: String,
    },

    #[error("Amount must be greater than zero (error 403)")]
    AmountZero,
}

impl ContractError {
    /// Stable numeric error code for client-side mapping.
    pub fn code(&self) -> u64 {
        match self {
            ContractError::Std(_) => 100,
            ContractError::InvalidTransferStatus => 103,
            ContractError::InvalidFeeRate { .. } => 105,
            ContractError::SenderRecipientSame => 106,
            ContractError::EscrowNotFound { .. } => 201,
            ContractError::EscrowNotLocked { .. } => 202,
            ContractError::DuplicateEscrow { .. } => 203,
            ContractError::Unauthorized => 300,
            ContractError::ContractPaused => 303,
            ContractError::InsufficientBalance { .. } => 402,
            ContractError::AmountZero => 403,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ContractError::InvalidTransferStatus.code(), 103);
        assert_eq!(ContractError::SenderRecipientSame.code(), 106);
        assert_eq!(ContractError::EscrowNotFound { id: 1 }.code(), 201);
        assert_eq!(ContractError::EscrowNotLocked { id: 1 }.code(), 202);
        assert_eq!(ContractError::Unauthorized.code(), 300);
        assert_eq!(ContractError::ContractPaused.code(), 303);
        assert_eq!(ContractError::AmountZero.code(), 403);
    }

    #[test]
    fn display_carries_code() {
        // Clients parse the trailing "(error N)" from failure logs
        let msg = ContractError::ContractPaused.to_string();
        assert!(msg.contains("(error 303)"));
    }
}
