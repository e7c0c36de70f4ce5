//! # sevm-primitives
//!
//! Base types shared by every crate of the EVM: addresses, hashes, 256-bit
//! words, the execution environment, account state, hardfork identifiers and
//! the result/error surface of a transaction.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod db;
pub mod eip4844;
pub mod env;
pub mod log;
pub mod result;
pub mod specification;
pub mod state;

pub use alloy_primitives::{
    self, address, b256, bytes, fixed_bytes, hex, keccak256, uint, Address, Bytes, TxKind, B256,
    U256,
};
pub use bytecode::Bytecode;
pub use constants::*;
pub use db::{Database, DatabaseRef};
pub use eip4844::*;
pub use env::*;
pub use hashbrown::{hash_map, hash_set, HashMap, HashSet};
pub use log::Log;
pub use result::*;
pub use specification::*;
pub use state::*;

/// The state of all loaded accounts, keyed by address.
pub type EvmState = HashMap<Address, Account>;

/// Account storage, keyed by slot index.
pub type EvmStorage = HashMap<U256, StorageSlot>;

/// Per-transaction transient storage (EIP-1153), keyed by `(address, slot)`.
pub type TransientStorage = HashMap<(Address, U256), U256>;
