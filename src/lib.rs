//! Redact cycler library surface.
//!
//! Runs paced encrypt / decrypt / claim transactions against the encrypted-ETH
//! contract for every configured account, round after round, until interrupted.
//! The binary in `src/main.rs` wires these modules to the live network.

pub mod core;
pub mod error;
pub mod executor;
pub mod runtime;
pub mod storage;
pub mod utils;

pub mod config {
    pub mod chains;
}
