//! Integration tests for the remittance contract using cw-multi-test.
//!
//! These tests verify the transfer lifecycle (initiate/complete/cancel),
//! authorization, pause behaviour, and escrow balance accounting against a
//! simulated chain with real bank balances.

use cosmwasm_std::{coins, Addr, Coin, Uint128};
use cw_multi_test::{App, ContractWrapper, Executor};

use remittance::msg::{
    EscrowBalanceResponse, EscrowInfoResponse, ExecuteMsg, InstantiateMsg, PausedStatusResponse,
    QueryMsg, StatsResponse, TransferCountResponse, TransferResponse, TransferStatusResponse,
};
use remittance::{ContractError, EscrowStatus, TransferStatus};

const DENOM: &str = "uluna";

// ============================================================================
// Test Setup
// ============================================================================

fn contract_remittance() -> Box<dyn cw_multi_test::Contract<cosmwasm_std::Empty>> {
    let contract = ContractWrapper::new(
        remittance::contract::execute,
        remittance::contract::instantiate,
        remittance::contract::query,
    );
    Box::new(contract)
}

struct TestEnv {
    app: App,
    contract: Addr,
    admin: Addr,
    alice: Addr,
    bob: Addr,
    collector: Addr,
}

/// Instantiate the contract with `fee_bps` and fund alice and bob.
fn setup(fee_bps: u64) -> TestEnv {
    let mut app = App::default();

    let admin = Addr::unchecked("terra1admin");
    let alice = Addr::unchecked("terra1alice");
    let bob = Addr::unchecked("terra1bob");
    let collector = Addr::unchecked("terra1collector");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &alice, coins(10_000_000_000, DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &bob, coins(10_000_000_000, DENOM))
            .unwrap();
    });

    let code_id = app.store_code(contract_remittance());

    let contract = app
        .instantiate_contract(
            code_id,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                fee_bps,
                fee_collector: collector.to_string(),
                denom: DENOM.to_string(),
            },
            &[],
            "remittance",
            Some(admin.to_string()),
        )
        .unwrap();

    TestEnv {
        app,
        contract,
        admin,
        alice,
        bob,
        collector,
    }
}

fn balance(env: &TestEnv, addr: &Addr) -> u128 {
    env.app
        .wrap()
        .query_balance(addr, DENOM)
        .unwrap()
        .amount
        .u128()
}

fn query_transfer(env: &TestEnv, id: u64) -> Option<TransferResponse> {
    env.app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::Transfer { id })
        .unwrap()
}

fn initiate(env: &mut TestEnv, sender: &Addr, recipient: &Addr, amount: u128, attach: u128) -> u64 {
    env.app
        .execute_contract(
            sender.clone(),
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: recipient.to_string(),
                amount: Uint128::from(amount),
            },
            &coins(attach, DENOM),
        )
        .unwrap();

    let count: TransferCountResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::TransferCount {})
        .unwrap();
    count.count
}

// ============================================================================
// Lifecycle: initiate -> complete
// ============================================================================

#[test]
fn initiate_and_complete_transfer() {
    // 1,000,000 at 100 bps (1%) -> fee 10,000
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();

    let alice_before = balance(&env, &env.alice);
    let bob_before = balance(&env, &env.bob);

    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);
    assert_eq!(id, 1);

    // Sender debited amount + fee, funds held by the contract
    assert_eq!(balance(&env, &env.alice), alice_before - 1_010_000);
    assert_eq!(balance(&env, &env.contract), 1_010_000);

    let transfer = query_transfer(&env, id).unwrap();
    assert_eq!(transfer.amount, Uint128::from(1_000_000u128));
    assert_eq!(transfer.fee, Uint128::from(10_000u128));
    assert_eq!(transfer.status, TransferStatus::Pending);
    assert_eq!(transfer.sender, env.alice);
    assert_eq!(transfer.recipient, env.bob);
    assert!(transfer.completed_at.is_none());
    assert!(transfer.cancelled_at.is_none());

    // Recipient claims
    env.app
        .execute_contract(
            bob.clone(),
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap();

    // Recipient nets exactly the amount; the fee goes to the collector
    assert_eq!(balance(&env, &env.bob), bob_before + 1_000_000);
    assert_eq!(balance(&env, &env.collector), 10_000);
    assert_eq!(balance(&env, &env.contract), 0);

    let transfer = query_transfer(&env, id).unwrap();
    assert_eq!(transfer.status, TransferStatus::Completed);
    assert!(transfer.completed_at.is_some());
    assert!(transfer.cancelled_at.is_none());

    let stats: StatsResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::Stats {})
        .unwrap();
    assert_eq!(stats.total_transfers, 1);
    assert_eq!(stats.total_completed, 1);
    assert_eq!(stats.total_fees_collected, Uint128::from(10_000u128));
}

// ============================================================================
// Lifecycle: initiate -> cancel
// ============================================================================

#[test]
fn initiate_and_cancel_transfer() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();

    let alice_before = balance(&env, &env.alice);
    let bob_before = balance(&env, &env.bob);

    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            alice.clone(),
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap();

    // Full refund including the fee reservation; recipient untouched
    assert_eq!(balance(&env, &env.alice), alice_before);
    assert_eq!(balance(&env, &env.bob), bob_before);
    assert_eq!(balance(&env, &env.collector), 0);
    assert_eq!(balance(&env, &env.contract), 0);

    let transfer = query_transfer(&env, id).unwrap();
    assert_eq!(transfer.status, TransferStatus::Cancelled);
    assert!(transfer.cancelled_at.is_some());
}

// ============================================================================
// Exactly-once resolution
// ============================================================================

#[test]
fn complete_twice_fails() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            bob.clone(),
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap();

    let err: ContractError = env
        .app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidTransferStatus);
    assert_eq!(err.code(), 103);
}

#[test]
fn cancel_twice_fails() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            alice.clone(),
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap();

    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidTransferStatus);
}

#[test]
fn cancel_after_complete_fails() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap();

    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidTransferStatus);
}

// ============================================================================
// Authorization
// ============================================================================

#[test]
fn only_recipient_can_complete() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    // Sender tries to complete
    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Unauthorized);
    assert_eq!(err.code(), 300);

    // Status unchanged
    let transfer = query_transfer(&env, id).unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
}

#[test]
fn only_sender_can_cancel() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    let err: ContractError = env
        .app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Unauthorized);

    let transfer = query_transfer(&env, id).unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
}

#[test]
fn resolving_missing_transfer_fails_with_status_error() {
    let mut env = setup(100);
    let bob = env.bob.clone();

    let err: ContractError = env
        .app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id: 42 },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    // Not-found reports the same code as already-resolved
    assert_eq!(err, ContractError::InvalidTransferStatus);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn zero_amount_rejected() {
    let mut env = setup(100);
    let alice = env.alice.clone();

    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: env.bob.to_string(),
                amount: Uint128::zero(),
            },
            &coins(1_000, DENOM),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::AmountZero);
    assert_eq!(err.code(), 403);
}

#[test]
fn self_transfer_rejected() {
    let mut env = setup(100);
    let alice = env.alice.clone();

    let err: ContractError = env
        .app
        .execute_contract(
            alice.clone(),
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: alice.to_string(),
                amount: Uint128::from(1_000_000u128),
            },
            &coins(1_010_000, DENOM),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::SenderRecipientSame);
    assert_eq!(err.code(), 106);
}

#[test]
fn insufficient_attached_funds_rejected() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let alice_before = balance(&env, &env.alice);

    // Needs 1,010,000 attached, sends only the principal
    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: env.bob.to_string(),
                amount: Uint128::from(1_000_000u128),
            },
            &coins(1_000_000, DENOM),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err.code(), 402);
    assert!(matches!(err, ContractError::InsufficientBalance { .. }));

    // Atomic failure: nothing was created, nothing was debited
    assert_eq!(balance(&env, &env.alice), alice_before);
    assert!(query_transfer(&env, 1).is_none());
    let count: TransferCountResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::TransferCount {})
        .unwrap();
    assert_eq!(count.count, 0);
}

#[test]
fn surplus_attached_funds_returned() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let alice_before = balance(&env, &env.alice);

    // Attach 200,000 more than needed
    initiate(&mut env, &alice, &bob, 1_000_000, 1_210_000);

    // Only amount + fee was kept
    assert_eq!(balance(&env, &env.alice), alice_before - 1_010_000);
    assert_eq!(balance(&env, &env.contract), 1_010_000);
}

// ============================================================================
// Pause behaviour
// ============================================================================

#[test]
fn paused_blocks_new_transfers_only() {
    let mut env = setup(100);
    let admin = env.admin.clone();
    let alice = env.alice.clone();
    let bob = env.bob.clone();

    // A transfer pending from before the pause
    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            admin.clone(),
            env.contract.clone(),
            &ExecuteMsg::PauseContract {},
            &[],
        )
        .unwrap();

    let paused: PausedStatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::PausedStatus {})
        .unwrap();
    assert!(paused.paused);

    // New transfers are blocked
    let err: ContractError = env
        .app
        .execute_contract(
            alice.clone(),
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: bob.to_string(),
                amount: Uint128::from(1_000u128),
            },
            &coins(1_010, DENOM),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::ContractPaused);
    assert_eq!(err.code(), 303);

    // Pending transfers remain resolvable: funds are never stranded
    env.app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap();

    // And unpause restores initiation
    env.app
        .execute_contract(
            admin,
            env.contract.clone(),
            &ExecuteMsg::UnpauseContract {},
            &[],
        )
        .unwrap();
    let alice2 = env.alice.clone();
    let bob2 = env.bob.clone();
    initiate(&mut env, &alice2, &bob2, 1_000, 1_010);
}

#[test]
fn cancel_works_while_paused() {
    let mut env = setup(100);
    let admin = env.admin.clone();
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let alice_before = balance(&env, &env.alice);

    let id = initiate(&mut env, &alice, &bob, 1_000_000, 1_010_000);

    env.app
        .execute_contract(
            admin,
            env.contract.clone(),
            &ExecuteMsg::PauseContract {},
            &[],
        )
        .unwrap();

    env.app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id },
            &[],
        )
        .unwrap();
    assert_eq!(balance(&env, &env.alice), alice_before);
}

#[test]
fn only_admin_can_pause() {
    let mut env = setup(100);
    let alice = env.alice.clone();

    let err: ContractError = env
        .app
        .execute_contract(
            alice,
            env.contract.clone(),
            &ExecuteMsg::PauseContract {},
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Unauthorized);
}

// ============================================================================
// Escrow accounting
// ============================================================================

#[test]
fn escrow_balance_tracks_locked_amounts() {
    let mut env = setup(0);
    let alice = env.alice.clone();
    let bob = env.bob.clone();

    let id1 = initiate(&mut env, &alice, &bob, 100_000, 100_000);
    let id2 = initiate(&mut env, &bob, &alice, 40_000, 40_000);

    let esc: EscrowBalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.contract,
            &QueryMsg::EscrowBalance {
                account: alice.to_string(),
            },
        )
        .unwrap();
    // Alice is sender of id1 and recipient of id2
    assert_eq!(esc.balance, Uint128::from(140_000u128));

    // Resolve both: balance returns to zero
    env.app
        .execute_contract(
            bob.clone(),
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id: id1 },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CancelTransfer { id: id2 },
            &[],
        )
        .unwrap();

    let esc: EscrowBalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.contract,
            &QueryMsg::EscrowBalance {
                account: alice.to_string(),
            },
        )
        .unwrap();
    assert_eq!(esc.balance, Uint128::zero());
}

#[test]
fn escrow_record_mirrors_lifecycle() {
    let mut env = setup(100);
    let alice = env.alice.clone();
    let bob = env.bob.clone();
    let id = initiate(&mut env, &alice, &bob, 500_000, 505_000);

    let info: Option<EscrowInfoResponse> = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::EscrowInfo { id })
        .unwrap();
    let info = info.unwrap();
    assert_eq!(info.status, EscrowStatus::Locked);
    assert_eq!(info.amount, Uint128::from(500_000u128));

    env.app
        .execute_contract(
            bob,
            env.contract.clone(),
            &ExecuteMsg::CompleteTransfer { id },
            &[],
        )
        .unwrap();

    let info: Option<EscrowInfoResponse> = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::EscrowInfo { id })
        .unwrap();
    assert_eq!(info.unwrap().status, EscrowStatus::Released);
}

// ============================================================================
// Ids and listings
// ============================================================================

#[test]
fn ids_are_monotonic_and_listable() {
    let mut env = setup(0);
    let alice = env.alice.clone();
    let bob = env.bob.clone();

    for expected in 1..=5u64 {
        let id = initiate(&mut env, &alice, &bob, 1_000, 1_000);
        assert_eq!(id, expected);
    }

    let status: TransferStatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::TransferStatus { id: 3 })
        .unwrap();
    assert_eq!(status.status, Some(TransferStatus::Pending));

    let status: TransferStatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.contract, &QueryMsg::TransferStatus { id: 99 })
        .unwrap();
    assert_eq!(status.status, None);

    // Cursor pagination
    let page: remittance::msg::TransfersResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.contract,
            &QueryMsg::Transfers {
                start_after: Some(2),
                limit: Some(2),
            },
        )
        .unwrap();
    let ids: Vec<u64> = page.transfers.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn foreign_denom_does_not_fund_a_transfer() {
    let mut env = setup(0);
    let alice = env.alice.clone();

    env.app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(
                storage,
                &alice,
                vec![
                    Coin::new(1_000u128, DENOM),
                    Coin::new(5_000u128, "uusd"),
                ],
            )
            .unwrap();
    });

    // Attaching only foreign coins covers nothing and they come back
    let err: ContractError = env
        .app
        .execute_contract(
            alice.clone(),
            env.contract.clone(),
            &ExecuteMsg::InitiateTransfer {
                recipient: env.bob.to_string(),
                amount: Uint128::from(1_000u128),
            },
            &[Coin {
                denom: "uusd".to_string(),
                amount: Uint128::from(5_000u128),
            }],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert!(matches!(err, ContractError::InsufficientBalance { .. }));
    assert_eq!(
        env.app
            .wrap()
            .query_balance(&alice, "uusd")
            .unwrap()
            .amount
            .u128(),
        5_000
    );
}
