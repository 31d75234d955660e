//! Escrow Vault Module
//!
//! Custody sub-ledger for locked transfer balances, keyed by transfer id.
//! The vault knows nothing about fees or business semantics beyond the id:
//! it exposes exactly three mutations (lock, release, refund) and enforces
//! the balance invariant that the locked amount for an id equals the
//! original `amount` until resolution, after which it is zero.
//!
//! The `Locked -> Released/Refunded` transition is checked and written in the
//! same storage save as the state read, so within the chain's serialized
//! execution at most one of release/refund can ever succeed for an id.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};
use cw_storage_plus::Map;

use crate::error::ContractError;

// ============================================================================
// Data Structures
// ============================================================================

/// Custody status of an escrow record
#[cw_serde]
pub enum EscrowStatus {
    /// Funds held by the vault
    Locked,
    /// Funds paid out to the recipient
    Released,
    /// Funds returned to the sender
    Refunded,
}

impl EscrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscrowStatus::Locked => "locked",
            EscrowStatus::Released => "released",
            EscrowStatus::Refunded => "refunded",
        }
    }
}

/// Escrow record, one per transfer id, created atomically with the transfer
#[cw_serde]
pub struct EscrowRecord {
    pub sender: Addr,
    pub recipient: Addr,
    pub amount: Uint128,
    /// Block height when the funds were locked
    pub locked_at: u64,
    pub status: EscrowStatus,
}

// ============================================================================
// Storage
// ============================================================================

/// Escrow records keyed by transfer id
pub const ESCROWS: Map<u64, EscrowRecord> = Map::new("escrows");

// ============================================================================
// Vault Operations
// ============================================================================

/// Lock `amount` for `id`. Fails if the amount is zero or a record for the
/// id already exists.
pub fn lock(
    storage: &mut dyn Storage,
    id: u64,
    sender: &Addr,
    recipient: &Addr,
    amount: Uint128,
    height: u64,
) -> Result<(), ContractError> {
    if amount.is_zero() {
        return Err(ContractError::AmountZero);
    }
    if ESCROWS.may_load(storage, id)?.is_some() {
        return Err(ContractError::DuplicateEscrow { id });
    }

    let record = EscrowRecord {
        sender: sender.clone(),
        recipient: recipient.clone(),
        amount,
        locked_at: height,
        status: EscrowStatus::Locked,
    };
    ESCROWS.save(storage, id, &record)?;
    Ok(())
}

/// Release the locked amount for `id` to the recipient, returning the
/// updated record so the caller can build the payout message.
pub fn release(storage: &mut dyn Storage, id: u64) -> Result<EscrowRecord, ContractError> {
    resolve(storage, id, EscrowStatus::Released)
}

/// Refund the locked amount for `id` to the sender.
pub fn refund(storage: &mut dyn Storage, id: u64) -> Result<EscrowRecord, ContractError> {
    resolve(storage, id, EscrowStatus::Refunded)
}

/// Checked transition `Locked -> terminal`. `EscrowNotLocked` covers both
/// "already released" and "already refunded".
fn resolve(
    storage: &mut dyn Storage,
    id: u64,
    to: EscrowStatus,
) -> Result<EscrowRecord, ContractError> {
    let mut record = ESCROWS
        .may_load(storage, id)?
        .ok_or(ContractError::EscrowNotFound { id })?;

    if record.status != EscrowStatus::Locked {
        return Err(ContractError::EscrowNotLocked { id });
    }

    record.status = to;
    ESCROWS.save(storage, id, &record)?;
    Ok(record)
}

// ============================================================================
// Read Helpers
// ============================================================================

/// Load an escrow record (if any)
pub fn escrow_info(storage: &dyn Storage, id: u64) -> StdResult<Option<EscrowRecord>> {
    ESCROWS.may_load(storage, id)
}

/// Sum of currently locked amounts where `account` is sender or recipient
pub fn escrow_balance(storage: &dyn Storage, account: &Addr) -> StdResult<Uint128> {
    ESCROWS
        .range(storage, None, None, Order::Ascending)
        .try_fold(Uint128::zero(), |total, item| {
            let (_, record) = item?;
            let involved = record.sender == *account || record.recipient == *account;
            if involved && record.status == EscrowStatus::Locked {
                Ok(total + record.amount)
            } else {
                Ok(total)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    fn addrs() -> (Addr, Addr) {
        (Addr::unchecked("sender"), Addr::unchecked("recipient"))
    }

    #[test]
    fn lock_rejects_zero_amount() {
        let mut deps = mock_dependencies();
        let (sender, recipient) = addrs();

        let err = lock(
            deps.as_mut().storage,
            1,
            &sender,
            &recipient,
            Uint128::zero(),
            10,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::AmountZero);
    }

    #[test]
    fn lock_rejects_duplicate_id() {
        let mut deps = mock_dependencies();
        let (sender, recipient) = addrs();
        let amount = Uint128::from(1000u128);

        lock(deps.as_mut().storage, 1, &sender, &recipient, amount, 10).unwrap();
        let err = lock(deps.as_mut().storage, 1, &sender, &recipient, amount, 11).unwrap_err();
        assert_eq!(err, ContractError::DuplicateEscrow { id: 1 });
    }

    #[test]
    fn release_then_refund_fails() {
        let mut deps = mock_dependencies();
        let (sender, recipient) = addrs();
        let amount = Uint128::from(1000u128);

        lock(deps.as_mut().storage, 1, &sender, &recipient, amount, 10).unwrap();

        let record = release(deps.as_mut().storage, 1).unwrap();
        assert_eq!(record.status, EscrowStatus::Released);
        assert_eq!(record.amount, amount);

        // Terminal: neither resolution can run again
        let err = refund(deps.as_mut().storage, 1).unwrap_err();
        assert_eq!(err, ContractError::EscrowNotLocked { id: 1 });
        let err = release(deps.as_mut().storage, 1).unwrap_err();
        assert_eq!(err, ContractError::EscrowNotLocked { id: 1 });
    }

    #[test]
    fn refund_then_release_fails() {
        let mut deps = mock_dependencies();
        let (sender, recipient) = addrs();

        lock(
            deps.as_mut().storage,
            7,
            &sender,
            &recipient,
            Uint128::from(5u128),
            10,
        )
        .unwrap();

        let record = refund(deps.as_mut().storage, 7).unwrap();
        assert_eq!(record.status, EscrowStatus::Refunded);

        let err = release(deps.as_mut().storage, 7).unwrap_err();
        assert_eq!(err, ContractError::EscrowNotLocked { id: 7 });
    }

    #[test]
    fn resolve_missing_record_fails() {
        let mut deps = mock_dependencies();
        let err = release(deps.as_mut().storage, 99).unwrap_err();
        assert_eq!(err, ContractError::EscrowNotFound { id: 99 });
    }

    #[test]
    fn balance_sums_locked_only() {
        let mut deps = mock_dependencies();
        let (sender, recipient) = addrs();
        let other = Addr::unchecked("other");

        lock(
            deps.as_mut().storage,
            1,
            &sender,
            &recipient,
            Uint128::from(100u128),
            10,
        )
        .unwrap();
        lock(
            deps.as_mut().storage,
            2,
            &sender,
            &other,
            Uint128::from(250u128),
            11,
        )
        .unwrap();
        lock(
            deps.as_mut().storage,
            3,
            &other,
            &recipient,
            Uint128::from(40u128),
            12,
        )
        .unwrap();

        // Sender is party to ids 1 and 2
        let balance = escrow_balance(deps.as_ref().storage, &sender).unwrap();
        assert_eq!(balance, Uint128::from(350u128));

        // Recipient is party to ids 1 and 3
        let balance = escrow_balance(deps.as_ref().storage, &recipient).unwrap();
        assert_eq!(balance, Uint128::from(140u128));

        // Resolution removes the id from the locked sum
        release(deps.as_mut().storage, 1).unwrap();
        let balance = escrow_balance(deps.as_ref().storage, &sender).unwrap();
        assert_eq!(balance, Uint128::from(250u128));

        // Uninvolved account holds nothing
        let balance = escrow_balance(deps.as_ref().storage, &Addr::unchecked("nobody")).unwrap();
        assert_eq!(balance, Uint128::zero());
    }
}
