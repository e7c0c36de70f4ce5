use crate::JournaledState;
use alloc::boxed::Box;
use interpreter::{Host, SStoreResult, SelfDestructResult};
use precompile::Precompiles;
use primitives::{
    Address, Bytecode, Database, Env, EVMError, HashSet, Log, SpecId, B256, U256,
};

/// The inner context of the EVM driver: environment, journaled state, the
/// database and the active precompile set.
///
/// This is the journaled [`Host`] implementation the interpreter runs
/// against during real execution.
pub struct EvmContext<DB: Database> {
    /// The environment of the current transaction.
    pub env: Box<Env>,
    /// The journaled state.
    pub journaled_state: JournaledState,
    /// The database backing the state.
    pub db: DB,
    /// A deferred database error; interpreter callbacks cannot propagate it,
    /// so it is stashed here and surfaced as a fatal external error.
    pub error: Option<DB::Error>,
    /// Precompiles active for the configured spec.
    pub precompiles: &'static Precompiles,
}

impl<DB: Database> EvmContext<DB> {
    /// Creates a new context. The precompile addresses of the configured
    /// spec are preloaded warm.
    pub fn new(db: DB, env: Box<Env>) -> Self {
        let spec_id = env.cfg.spec_id;
        let precompiles = Precompiles::new(precompile::SpecId::from_spec_id(spec_id));
        let warm_addresses: HashSet<Address> = precompiles.addresses().copied().collect();
        Self {
            env,
            journaled_state: JournaledState::new(spec_id, warm_addresses),
            db,
            error: None,
            precompiles,
        }
    }

    /// The active hardfork.
    #[inline]
    pub fn spec_id(&self) -> SpecId {
        self.env.cfg.spec_id
    }

    /// Loads the access list of the transaction into the journaled state so
    /// that the listed accounts and slots are warm (EIP-2930).
    #[inline]
    pub fn load_access_list(&mut self) -> Result<(), EVMError<DB::Error>> {
        for item in self.env.tx.access_list.clone() {
            self.journaled_state
                .initial_account_load(item.address, item.storage_keys, &mut self.db)
                .map_err(EVMError::Database)?;
        }
        Ok(())
    }

    /// Takes the stashed database error, panicking if none is present.
    #[inline]
    pub fn take_error(&mut self) -> DB::Error {
        self.error.take().expect("fatal external error without a database error")
    }
}

impl<DB: Database> Host for EvmContext<DB> {
    fn env(&self) -> &Env {
        &self.env
    }

    fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    fn load_account(&mut self, address: Address) -> Option<(bool, bool)> {
        let spec = self.journaled_state.spec;
        self.journaled_state
            .load_account(address, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
            .map(|(account, is_cold)| (is_cold, !account.state_clear_aware_is_empty(spec)))
    }

    fn block_hash(&mut self, number: u64) -> Option<B256> {
        self.db
            .block_hash(number)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn balance(&mut self, address: Address) -> Option<(U256, bool)> {
        self.journaled_state
            .load_account(address, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
            .map(|(account, is_cold)| (account.info.balance, is_cold))
    }

    fn code(&mut self, address: Address) -> Option<(Bytecode, bool)> {
        self.journaled_state
            .load_code(address, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
            .map(|(account, is_cold)| (account.info.code.clone().unwrap_or_default(), is_cold))
    }

    fn code_hash(&mut self, address: Address) -> Option<(B256, bool)> {
        let (account, is_cold) = self
            .journaled_state
            .load_code(address, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()?;
        if account.is_empty() {
            return Some((B256::ZERO, is_cold));
        }
        Some((account.info.code_hash, is_cold))
    }

    fn sload(&mut self, address: Address, index: U256) -> Option<(U256, bool)> {
        self.journaled_state
            .sload(address, index, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn sstore(&mut self, address: Address, index: U256, value: U256) -> Option<SStoreResult> {
        self.journaled_state
            .sstore(address, index, value, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }

    fn tload(&mut self, address: Address, index: U256) -> U256 {
        self.journaled_state.tload(address, index)
    }

    fn tstore(&mut self, address: Address, index: U256, value: U256) {
        self.journaled_state.tstore(address, index, value)
    }

    fn log(&mut self, log: Log) {
        self.journaled_state.log(log);
    }

    fn selfdestruct(&mut self, address: Address, target: Address) -> Option<SelfDestructResult> {
        self.journaled_state
            .selfdestruct(address, target, &mut self.db)
            .map_err(|e| self.error = Some(e))
            .ok()
    }
}
