use crate::{Host, SStoreResult, SelfDestructResult};
use alloc::vec::Vec;
use primitives::{hash_map::Entry, Address, Bytecode, Env, HashMap, Log, B256, U256};

/// A plain in-memory host for interpreter tests.
///
/// Storage lives in flat maps, checkpoints do not exist and selfdestruct only
/// records that it happened.
#[derive(Debug, Default)]
pub struct PlainHost {
    pub env: Env,
    pub storage: HashMap<U256, U256>,
    pub transient_storage: HashMap<U256, U256>,
    pub log: Vec<Log>,
    pub selfdestructs: Vec<(Address, Address)>,
}

impl PlainHost {
    /// Creates a plain host with the given environment.
    pub fn new(env: Env) -> Self {
        Self {
            env,
            ..Default::default()
        }
    }

    /// Clears the host leaving the environment in place.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.transient_storage.clear();
        self.log.clear();
        self.selfdestructs.clear();
    }
}

impl Host for PlainHost {
    fn env(&self) -> &Env {
        &self.env
    }

    fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    fn load_account(&mut self, _address: Address) -> Option<(bool, bool)> {
        Some((false, true))
    }

    fn block_hash(&mut self, _number: u64) -> Option<B256> {
        Some(B256::ZERO)
    }

    fn balance(&mut self, _address: Address) -> Option<(U256, bool)> {
        Some((U256::ZERO, false))
    }

    fn code(&mut self, _address: Address) -> Option<(Bytecode, bool)> {
        Some((Bytecode::default(), false))
    }

    fn code_hash(&mut self, _address: Address) -> Option<(B256, bool)> {
        Some((B256::ZERO, false))
    }

    fn sload(&mut self, _address: Address, index: U256) -> Option<(U256, bool)> {
        match self.storage.entry(index) {
            Entry::Occupied(entry) => Some((*entry.get(), false)),
            Entry::Vacant(entry) => {
                entry.insert(U256::ZERO);
                Some((U256::ZERO, true))
            }
        }
    }

    fn sstore(&mut self, _address: Address, index: U256, value: U256) -> Option<SStoreResult> {
        let present = self.storage.insert(index, value);
        Some(SStoreResult {
            original_value: U256::ZERO,
            present_value: present.unwrap_or_default(),
            new_value: value,
            is_cold: present.is_none(),
        })
    }

    fn tload(&mut self, _address: Address, index: U256) -> U256 {
        self.transient_storage
            .get(&index)
            .copied()
            .unwrap_or_default()
    }

    fn tstore(&mut self, _address: Address, index: U256, value: U256) {
        self.transient_storage.insert(index, value);
    }

    fn log(&mut self, log: Log) {
        self.log.push(log);
    }

    fn selfdestruct(&mut self, address: Address, target: Address) -> Option<SelfDestructResult> {
        self.selfdestructs.push((address, target));
        Some(SelfDestructResult::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sload_tracks_cold_slots() {
        let mut host = PlainHost::default();
        assert_eq!(
            host.sload(Address::ZERO, U256::from(1)),
            Some((U256::ZERO, true))
        );
        assert_eq!(
            host.sload(Address::ZERO, U256::from(1)),
            Some((U256::ZERO, false))
        );
    }
}
