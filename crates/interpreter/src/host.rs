mod plain;

pub use plain::PlainHost;

use crate::{SStoreResult, SelfDestructResult};
use primitives::{Address, Bytecode, Env, Log, B256, U256};

/// The capability surface the interpreter uses to reach the world state.
///
/// Returning `None` from the fallible methods signals a database failure; the
/// interpreter turns it into a fatal external error.
pub trait Host {
    /// Returns a reference to the environment.
    fn env(&self) -> &Env;

    /// Returns a mutable reference to the environment.
    fn env_mut(&mut self) -> &mut Env;

    /// Loads an account and returns `(is_cold, exists)`.
    ///
    /// `exists` is `false` for accounts that are empty under the rules of the
    /// active spec; it drives the new-account surcharge of CALL.
    fn load_account(&mut self, address: Address) -> Option<(bool, bool)>;

    /// Gets the block hash of the given block number.
    fn block_hash(&mut self, number: u64) -> Option<B256>;

    /// Gets the balance of `address` and whether the account was cold.
    fn balance(&mut self, address: Address) -> Option<(U256, bool)>;

    /// Gets the code of `address` and whether the account was cold.
    fn code(&mut self, address: Address) -> Option<(Bytecode, bool)>;

    /// Gets the code hash of `address` and whether the account was cold.
    ///
    /// An empty account reports the zero hash.
    fn code_hash(&mut self, address: Address) -> Option<(B256, bool)>;

    /// Gets the storage value of `address` at `index` and whether the slot
    /// was cold.
    fn sload(&mut self, address: Address, index: U256) -> Option<(U256, bool)>;

    /// Sets the storage value of `address` at `index`.
    fn sstore(&mut self, address: Address, index: U256, value: U256) -> Option<SStoreResult>;

    /// Gets the transient storage value of `address` at `index`.
    fn tload(&mut self, address: Address, index: U256) -> U256;

    /// Sets the transient storage value of `address` at `index`.
    fn tstore(&mut self, address: Address, index: U256, value: U256);

    /// Emits a log.
    fn log(&mut self, log: Log);

    /// Marks `address` to be deleted, with funds transferred to `target`.
    fn selfdestruct(&mut self, address: Address, target: Address)
        -> Option<SelfDestructResult>;
}
