use super::EmptyDB;
use primitives::{
    hash_map::Entry, AccountInfo, Address, Bytecode, Database, DatabaseRef, HashMap, B256,
    KECCAK_EMPTY, U256,
};

/// A [Database] implementation that caches all loaded accounts in memory on
/// top of another database.
#[derive(Debug, Clone)]
pub struct CacheDB<ExtDB> {
    /// Cached account info and storage, keyed by address.
    pub accounts: HashMap<Address, DbAccount>,
    /// Cached contracts, keyed by code hash.
    pub contracts: HashMap<B256, Bytecode>,
    /// Cached block hashes, keyed by block number.
    pub block_hashes: HashMap<u64, B256>,
    /// The underlying database.
    pub db: ExtDB,
}

/// An account record of [`CacheDB`].
#[derive(Debug, Clone, Default)]
pub struct DbAccount {
    pub info: AccountInfo,
    /// Account storage.
    pub storage: HashMap<U256, U256>,
}

impl<ExtDB: Default> Default for CacheDB<ExtDB> {
    fn default() -> Self {
        Self::new(ExtDB::default())
    }
}

impl<ExtDB> CacheDB<ExtDB> {
    /// Creates a new cache over the given database.
    pub fn new(db: ExtDB) -> Self {
        Self {
            accounts: HashMap::default(),
            contracts: HashMap::default(),
            block_hashes: HashMap::default(),
            db,
        }
    }

    /// Inserts account info, registering its code under the code hash.
    pub fn insert_account_info(&mut self, address: Address, mut info: AccountInfo) {
        if let Some(code) = &info.code {
            if !code.is_empty() {
                if info.code_hash == KECCAK_EMPTY {
                    info.code_hash = code.hash_slow();
                }
                self.contracts.insert(info.code_hash, code.clone());
            }
        }
        self.accounts.entry(address).or_default().info = info;
    }

    /// Inserts a storage slot value for the given account.
    pub fn insert_account_storage(&mut self, address: Address, slot: U256, value: U256) {
        self.accounts
            .entry(address)
            .or_default()
            .storage
            .insert(slot, value);
    }

    /// Inserts a block hash.
    pub fn insert_block_hash(&mut self, number: u64, hash: B256) {
        self.block_hashes.insert(number, hash);
    }
}

impl<ExtDB: DatabaseRef> Database for CacheDB<ExtDB> {
    type Error = ExtDB::Error;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        match self.accounts.entry(address) {
            Entry::Occupied(entry) => Ok(Some(entry.get().info.clone())),
            Entry::Vacant(entry) => Ok(self
                .db
                .basic_ref(address)?
                .map(|info| entry.insert(DbAccount {
                    info,
                    storage: HashMap::default(),
                })
                .info
                .clone())),
        }
    }

    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        match self.contracts.entry(code_hash) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => Ok(entry.insert(self.db.code_by_hash_ref(code_hash)?).clone()),
        }
    }

    fn storage(&mut self, address: Address, index: U256) -> Result<U256, Self::Error> {
        if let Some(account) = self.accounts.get(&address) {
            if let Some(value) = account.storage.get(&index) {
                return Ok(*value);
            }
        }
        self.db.storage_ref(address, index)
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        match self.block_hashes.entry(number) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => Ok(*entry.insert(self.db.block_hash_ref(number)?)),
        }
    }
}

/// An in-memory database: a [`CacheDB`] over an [`EmptyDB`].
pub type InMemoryDB = CacheDB<EmptyDB>;
