//! Execute message handlers.
//!
//! - `transfer` - transfer lifecycle (initiate, complete, cancel)
//! - `admin` - fee/pause policy

mod admin;
mod transfer;

pub use admin::{execute_pause, execute_set_fee_rate, execute_unpause};
pub use transfer::{execute_cancel_transfer, execute_complete_transfer, execute_initiate_transfer};
