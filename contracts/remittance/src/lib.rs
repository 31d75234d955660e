//! Lumenda Remittance Contract - Escrowed Peer-to-Peer Transfers
//!
//! This contract implements a value-transfer protocol with escrow settlement:
//! a sender locks funds for a named recipient, and the transfer resolves
//! exactly once, either by the recipient claiming the funds (completion) or
//! by the sender reclaiming them (cancellation).
//!
//! # Transfer Flow
//! 1. Sender calls `InitiateTransfer`, attaching `amount + fee` of the
//!    configured denom. Funds move into the escrow vault.
//! 2. The recipient calls `CompleteTransfer` to receive exactly `amount`;
//!    the fee is forwarded to the fee collector.
//! 3. Alternatively the sender calls `CancelTransfer` and recovers the full
//!    `amount + fee`.
//!
//! # Guarantees
//! - Exactly-once resolution: `Completed` and `Cancelled` are terminal and
//!   mutually exclusive
//! - Fee is fixed at creation time; later rate changes never apply
//!   retroactively
//! - Pause blocks new transfers only; pending transfers always remain
//!   resolvable
//! - Stable numeric error codes for client-side error mapping

pub mod contract;
pub mod error;
pub mod escrow;
mod execute;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::escrow::{EscrowRecord, EscrowStatus};
pub use crate::state::{Transfer, TransferStatus};
