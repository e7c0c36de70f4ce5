use crate::AccountInfo;
use alloy_primitives::{Address, B256, U256};
use bytecode::Bytecode;

/// The world-state interface the EVM executes against.
///
/// The journaled state caches everything it reads, so a database is only
/// consulted on the first access of an account, code blob or storage slot
/// within a transaction.
#[auto_impl::auto_impl(&mut, Box)]
pub trait Database {
    /// The database error type.
    type Error;

    /// Gets basic account information.
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Gets account code by its hash.
    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;

    /// Gets the storage value of `address` at `index`.
    fn storage(&mut self, address: Address, index: U256) -> Result<U256, Self::Error>;

    /// Gets the block hash of the given block number.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
}

/// [`Database`] for read-only access through shared references.
#[auto_impl::auto_impl(&, Box)]
pub trait DatabaseRef {
    /// The database error type.
    type Error;

    /// Gets basic account information.
    fn basic_ref(&self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Gets account code by its hash.
    fn code_by_hash_ref(&self, code_hash: B256) -> Result<Bytecode, Self::Error>;

    /// Gets the storage value of `address` at `index`.
    fn storage_ref(&self, address: Address, index: U256) -> Result<U256, Self::Error>;

    /// Gets the block hash of the given block number.
    fn block_hash_ref(&self, number: u64) -> Result<B256, Self::Error>;
}
