//! # sevm
//!
//! A Rust implementation of the Ethereum Virtual Machine: a stack-based,
//! deterministic bytecode interpreter that executes contract code against an
//! abstract world state, meters gas and coordinates nested call/create frames
//! with transactional state rollback.
//!
//! The crate is organized the way the workspace is:
//!
//! - [`primitives`] - base types, the environment and its validation.
//! - [`bytecode`] - bytecode analysis and the opcode set.
//! - [`interpreter`] - per-frame execution.
//! - [`precompile`] - the built-in contracts.
//! - this crate - the journaled state and the [`Evm`] driver.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod context;
pub mod db;
mod evm;
mod frame;
mod journal_entry;
mod journaled_state;

pub use context::EvmContext;
pub use db::{CacheDB, Database, DatabaseRef, EmptyDB, InMemoryDB};
pub use evm::Evm;
pub use frame::{CallFrame, FrameResult};
pub use journal_entry::{JournalCheckpoint, JournalEntry};
pub use journaled_state::{JournaledState, TransferError};

// Re-export of the member crates.
#[doc(inline)]
pub use bytecode;
#[doc(inline)]
pub use interpreter;
#[doc(inline)]
pub use precompile;
#[doc(inline)]
pub use primitives;
