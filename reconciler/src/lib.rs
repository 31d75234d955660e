//! Lumenda Reconciler - Library interface
//!
//! Re-exports internal modules for use in integration tests.

pub mod config;
pub mod db;
pub mod registry;
pub mod sync;
pub mod types;
