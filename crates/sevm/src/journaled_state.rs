pub use crate::journal_entry::{JournalCheckpoint, JournalEntry};

use alloc::{vec, vec::Vec};
use core::mem;
use interpreter::{SStoreResult, SelfDestructResult};
use primitives::{
    hash_map::Entry, Account, Address, Bytecode, Database, EvmState, HashSet, Log, SpecId,
    SpecId::*, StorageSlot, TransientStorage, KECCAK_EMPTY, U256,
};

/// Versioned mutations over an abstract [`Database`].
///
/// Every call frame opens a checkpoint; every mutation within the frame
/// appends an undo entry to the journal. Reverting a checkpoint undoes the
/// entries in strict reverse order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournaledState {
    /// The current state.
    pub state: EvmState,
    /// Transient storage that is discarded after every transaction (EIP-1153).
    pub transient_storage: TransientStorage,
    /// Logs emitted so far.
    pub logs: Vec<Log>,
    /// The current call stack depth.
    pub depth: usize,
    /// The journal of state changes, one segment per checkpoint.
    pub journal: Vec<Vec<JournalEntry>>,
    /// The active hardfork.
    ///
    /// The spec is used for two things here:
    ///
    /// - [EIP-161]: Prior to it, Ethereum had separate definitions for empty
    ///   and non-existing accounts.
    /// - [EIP-6780]: `SELFDESTRUCT` destroys only in the creating transaction.
    ///
    /// [EIP-161]: https://eips.ethereum.org/EIPS/eip-161
    /// [EIP-6780]: https://eips.ethereum.org/EIPS/eip-6780
    pub spec: SpecId,
    /// Warm loaded addresses used to check if a loaded address should be
    /// considered cold or warm on first access. Precompiles and access-list
    /// entries land here.
    pub warm_preloaded_addresses: HashSet<Address>,
}

/// Outcome of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// The sender does not have enough balance.
    OutOfFunds,
    /// Adding the value to the recipient overflows.
    OverflowPayment,
    /// The create target already has code or a nonce.
    CreateCollision,
}

impl JournaledState {
    /// Creates a new journaled state.
    ///
    /// `warm_preloaded_addresses` determines which addresses are loaded warm;
    /// ordinarily these are the precompiles.
    pub fn new(spec: SpecId, warm_preloaded_addresses: HashSet<Address>) -> Self {
        Self {
            state: EvmState::default(),
            transient_storage: TransientStorage::default(),
            logs: Vec::new(),
            journal: vec![vec![]],
            depth: 0,
            spec,
            warm_preloaded_addresses,
        }
    }

    /// Returns the call depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the loaded account for the given address.
    ///
    /// # Panics
    ///
    /// Panics if the account has not been loaded.
    #[inline]
    pub fn account(&self, address: Address) -> &Account {
        self.state
            .get(&address)
            .expect("account expected to be loaded")
    }

    /// Marks the account as touched. Only touched accounts are written back
    /// to the database, and touched empty accounts are cleared (EIP-161).
    #[inline]
    pub fn touch(&mut self, address: &Address) {
        if let Some(account) = self.state.get_mut(address) {
            Self::touch_account(self.journal.last_mut().unwrap(), address, account);
        }
    }

    #[inline]
    fn touch_account(journal: &mut Vec<JournalEntry>, address: &Address, account: &mut Account) {
        if !account.is_touched() {
            journal.push(JournalEntry::AccountTouched { address: *address });
            account.mark_touch();
        }
    }

    /// Sets the code of an account, computing its hash.
    ///
    /// The account is assumed to be loaded and warm.
    #[inline]
    pub fn set_code(&mut self, address: Address, code: Bytecode) {
        let account = self.state.get_mut(&address).unwrap();
        Self::touch_account(self.journal.last_mut().unwrap(), &address, account);

        self.journal
            .last_mut()
            .unwrap()
            .push(JournalEntry::CodeChange { address });

        account.info.code_hash = code.hash_slow();
        account.info.code = Some(code);
    }

    /// Increments the nonce of an account, returning the new nonce, or
    /// `None` on overflow.
    ///
    /// The account is assumed to be loaded.
    #[inline]
    pub fn inc_nonce(&mut self, address: Address) -> Option<u64> {
        let account = self.state.get_mut(&address).unwrap();
        if account.info.nonce == u64::MAX {
            return None;
        }
        Self::touch_account(self.journal.last_mut().unwrap(), &address, account);
        self.journal
            .last_mut()
            .unwrap()
            .push(JournalEntry::NonceChange { address });

        account.info.nonce += 1;

        Some(account.info.nonce)
    }

    /// Transfers balance between two accounts.
    ///
    /// A zero-value transfer still touches (and thereby possibly clears) the
    /// recipient.
    #[inline]
    pub fn transfer<DB: Database>(
        &mut self,
        from: &Address,
        to: &Address,
        balance: U256,
        db: &mut DB,
    ) -> Result<Option<TransferError>, DB::Error> {
        if balance.is_zero() {
            self.load_account(*to, db)?;
            let to_account = self.state.get_mut(to).unwrap();
            Self::touch_account(self.journal.last_mut().unwrap(), to, to_account);
            return Ok(None);
        }

        self.load_account(*from, db)?;
        self.load_account(*to, db)?;

        // Subtract from the sender.
        let from_account = self.state.get_mut(from).unwrap();
        Self::touch_account(self.journal.last_mut().unwrap(), from, from_account);
        let from_balance = &mut from_account.info.balance;
        let Some(from_balance_decr) = from_balance.checked_sub(balance) else {
            return Ok(Some(TransferError::OutOfFunds));
        };
        *from_balance = from_balance_decr;

        // Add to the recipient.
        let to_account = self.state.get_mut(to).unwrap();
        Self::touch_account(self.journal.last_mut().unwrap(), to, to_account);
        let to_balance = &mut to_account.info.balance;
        let Some(to_balance_incr) = to_balance.checked_add(balance) else {
            return Ok(Some(TransferError::OverflowPayment));
        };
        *to_balance = to_balance_incr;

        self.journal
            .last_mut()
            .unwrap()
            .push(JournalEntry::BalanceTransfer {
                from: *from,
                to: *to,
                balance,
            });

        Ok(None)
    }

    /// Creates an account under a fresh checkpoint, or fails with a
    /// collision.
    ///
    /// Steps:
    /// 1. Open the checkpoint.
    /// 2. Verify the caller can pay the endowment.
    /// 3. Verify that the target has no code and a zero nonce, else
    ///    [`TransferError::CreateCollision`].
    /// 4. Mark the target created, bump its nonce to 1 (Spurious Dragon+)
    ///    and move the endowment.
    ///
    /// # Panics
    ///
    /// Panics if the caller or the target are not loaded.
    #[inline]
    pub fn create_account_checkpoint(
        &mut self,
        caller: Address,
        target_address: Address,
        balance: U256,
        spec_id: SpecId,
    ) -> Result<JournalCheckpoint, TransferError> {
        let checkpoint = self.checkpoint();

        let caller_balance = self.state.get(&caller).unwrap().info.balance;
        if caller_balance < balance {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::OutOfFunds);
        }

        // The created account was loaded by the caller of this function.
        let target_account = self.state.get_mut(&target_address).unwrap();
        let last_journal = self.journal.last_mut().unwrap();

        // An account can only be created over an address without code and
        // with a zero nonce.
        if target_account.info.code_hash != KECCAK_EMPTY || target_account.info.nonce != 0 {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::CreateCollision);
        }

        target_account.mark_created();
        // This entry reverts the nonce and the created flag.
        last_journal.push(JournalEntry::AccountCreated {
            address: target_address,
        });
        target_account.info.code = None;

        // EIP-161: State trie clearing (invariant-preserving alternative)
        if spec_id.is_enabled_in(SPURIOUS_DRAGON) {
            target_account.info.nonce = 1;
        }

        // Touching matters here: pre Spurious Dragon even an empty created
        // account is persisted.
        Self::touch_account(last_journal, &target_address, target_account);

        let Some(new_balance) = target_account.info.balance.checked_add(balance) else {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::OverflowPayment);
        };
        target_account.info.balance = new_balance;

        // Safe to decrement: the balance check was done above.
        self.state.get_mut(&caller).unwrap().info.balance -= balance;

        self.journal
            .last_mut()
            .unwrap()
            .push(JournalEntry::BalanceTransfer {
                from: caller,
                to: target_address,
                balance,
            });

        Ok(checkpoint)
    }

    /// Makes a checkpoint to which the state can be rolled back.
    #[inline]
    pub fn checkpoint(&mut self) -> JournalCheckpoint {
        let checkpoint = JournalCheckpoint {
            log_i: self.logs.len(),
            journal_i: self.journal.len(),
        };
        self.depth += 1;
        self.journal.push(Default::default());
        checkpoint
    }

    /// Commits the checkpoint; accumulated entries become part of the
    /// enclosing segment's fate.
    #[inline]
    pub fn checkpoint_commit(&mut self) {
        self.depth -= 1;
    }

    /// Reverts all changes made after the checkpoint was taken.
    #[inline]
    pub fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        let is_spurious_dragon_enabled = self.spec.is_enabled_in(SPURIOUS_DRAGON);
        let state = &mut self.state;
        let transient_storage = &mut self.transient_storage;
        self.depth -= 1;

        // Iterate over the last segments and revert the global state,
        // newest entries first.
        let len = self.journal.len();
        self.journal
            .iter_mut()
            .rev()
            .take(len - checkpoint.journal_i)
            .for_each(|segment| {
                for entry in mem::take(segment).into_iter().rev() {
                    entry.revert(state, transient_storage, is_spurious_dragon_enabled);
                }
            });

        self.logs.truncate(checkpoint.log_i);
        self.journal.truncate(checkpoint.journal_i);
    }

    /// Performs a selfdestruct action: transfers the balance from `address`
    /// to `target` and, when the active spec allows it, marks the account to
    /// be destroyed.
    ///
    /// EIP-6780 (Cancun): the account is destroyed only if it was created in
    /// the same transaction; otherwise only the balance moves.
    ///
    /// The balance is lost when `address == target`, except on Cancun+ where
    /// that happens only for accounts created in the same transaction.
    #[inline]
    pub fn selfdestruct<DB: Database>(
        &mut self,
        address: Address,
        target: Address,
        db: &mut DB,
    ) -> Result<SelfDestructResult, DB::Error> {
        let spec = self.spec;
        let (target_account, is_cold) = self.load_account(target, db)?;
        let target_exists = !target_account.state_clear_aware_is_empty(spec);

        if address != target {
            // Both accounts are loaded before this point: `address` because
            // its contract is executing, `target` just above.
            let acc_balance = self.state.get(&address).unwrap().info.balance;

            let target_account = self.state.get_mut(&target).unwrap();
            Self::touch_account(self.journal.last_mut().unwrap(), &target, target_account);
            target_account.info.balance += acc_balance;
        }

        let account = self.state.get_mut(&address).unwrap();
        let balance = account.info.balance;
        let previously_destroyed = account.is_selfdestructed();
        let is_cancun_enabled = spec.is_enabled_in(CANCUN);

        let entry = if account.is_created() || !is_cancun_enabled {
            account.mark_selfdestruct();
            account.info.balance = U256::ZERO;
            Some(JournalEntry::AccountDestroyed {
                address,
                target,
                was_destroyed: previously_destroyed,
                had_balance: balance,
            })
        } else if address != target {
            account.info.balance = U256::ZERO;
            Some(JournalEntry::BalanceTransfer {
                from: address,
                to: target,
                balance,
            })
        } else {
            // Cancun+, account not created in this transaction and the
            // target is the account itself: nothing changes.
            None
        };

        if let Some(entry) = entry {
            self.journal.last_mut().unwrap().push(entry);
        }

        Ok(SelfDestructResult {
            had_value: !balance.is_zero(),
            target_exists,
            is_cold,
            previously_destroyed,
        })
    }

    /// Initial load of an account with storage slots, used for access-list
    /// preloads. This load is not tracked inside the journal.
    #[inline]
    pub fn initial_account_load<DB: Database>(
        &mut self,
        address: Address,
        storage_keys: impl IntoIterator<Item = U256>,
        db: &mut DB,
    ) -> Result<&mut Account, DB::Error> {
        let account = match self.state.entry(address) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(vac) => vac.insert(
                db.basic(address)?
                    .map(Into::into)
                    .unwrap_or_else(Account::new_not_existing),
            ),
        };
        // Preload storage slots.
        for storage_key in storage_keys.into_iter() {
            if let Entry::Vacant(entry) = account.storage.entry(storage_key) {
                let storage = db.storage(address, storage_key)?;
                let mut slot = StorageSlot::new(storage);
                slot.mark_warm();
                entry.insert(slot);
            }
        }
        Ok(account)
    }

    /// Loads an account from the state cache or the database; returns the
    /// account and whether the access was cold.
    #[inline]
    pub fn load_account<DB: Database>(
        &mut self,
        address: Address,
        db: &mut DB,
    ) -> Result<(&mut Account, bool), DB::Error> {
        let (account, is_cold) = match self.state.entry(address) {
            Entry::Occupied(entry) => {
                let account = entry.into_mut();
                let is_cold = account.mark_warm();
                (account, is_cold)
            }
            Entry::Vacant(vac) => {
                let account = match db.basic(address)? {
                    Some(info) => info.into(),
                    None => Account::new_not_existing(),
                };
                // Precompiles and access-list entries are warm loaded.
                let is_cold = !self.warm_preloaded_addresses.contains(&address);
                (vac.insert(account), is_cold)
            }
        };
        if is_cold {
            self.journal
                .last_mut()
                .unwrap()
                .push(JournalEntry::AccountWarmed { address });
        }
        Ok((account, is_cold))
    }

    /// Loads an account and makes sure its code is present.
    #[inline]
    pub fn load_code<DB: Database>(
        &mut self,
        address: Address,
        db: &mut DB,
    ) -> Result<(&mut Account, bool), DB::Error> {
        let (account, is_cold) = self.load_account(address, db)?;
        if account.info.code.is_none() {
            let code = if account.info.code_hash == KECCAK_EMPTY {
                Bytecode::default()
            } else {
                db.code_by_hash(account.info.code_hash)?
            };
            account.info.code = Some(code);
        }
        Ok((account, is_cold))
    }

    /// Loads a storage slot.
    ///
    /// # Panics
    ///
    /// Panics if the account is not present in the state.
    #[inline]
    pub fn sload<DB: Database>(
        &mut self,
        address: Address,
        key: U256,
        db: &mut DB,
    ) -> Result<(U256, bool), DB::Error> {
        // The account is always warm here: its code is being executed.
        let account = self.state.get_mut(&address).unwrap();
        // Only for accounts created in this transaction the storage is known
        // to be empty without asking the database.
        let is_newly_created = account.is_created();
        let (value, is_cold) = match account.storage.entry(key) {
            Entry::Occupied(occ) => {
                let slot = occ.into_mut();
                let is_cold = slot.mark_warm();
                (slot.present_value, is_cold)
            }
            Entry::Vacant(vac) => {
                let value = if is_newly_created {
                    U256::ZERO
                } else {
                    db.storage(address, key)?
                };
                let slot = vac.insert(StorageSlot::new(value));
                slot.mark_warm();
                (value, true)
            }
        };

        if is_cold {
            self.journal
                .last_mut()
                .unwrap()
                .push(JournalEntry::StorageWarmed { address, key });
        }

        Ok((value, is_cold))
    }

    /// Stores a storage slot, loading it first if needed (which provides the
    /// cold flag for pricing).
    ///
    /// A write of the present value is not journaled.
    #[inline]
    pub fn sstore<DB: Database>(
        &mut self,
        address: Address,
        key: U256,
        new: U256,
        db: &mut DB,
    ) -> Result<SStoreResult, DB::Error> {
        let (present, is_cold) = self.sload(address, key, db)?;
        let account = self.state.get_mut(&address).unwrap();
        let slot = account.storage.get_mut(&key).unwrap();

        if present == new {
            return Ok(SStoreResult {
                original_value: slot.original_value(),
                present_value: present,
                new_value: new,
                is_cold,
            });
        }

        self.journal
            .last_mut()
            .unwrap()
            .push(JournalEntry::StorageChanged {
                address,
                key,
                had_value: present,
            });
        slot.present_value = new;

        Ok(SStoreResult {
            original_value: slot.original_value(),
            present_value: present,
            new_value: new,
            is_cold,
        })
    }

    /// Reads transient storage tied to the account (EIP-1153).
    #[inline]
    pub fn tload(&mut self, address: Address, key: U256) -> U256 {
        self.transient_storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    /// Stores a transient storage value (EIP-1153); the previous value is
    /// journaled when it changes.
    #[inline]
    pub fn tstore(&mut self, address: Address, key: U256, new: U256) {
        let had_value = if new.is_zero() {
            // A zero write removes the entry; journal the previous value if
            // one existed.
            self.transient_storage.remove(&(address, key))
        } else {
            let previous_value = self
                .transient_storage
                .insert((address, key), new)
                .unwrap_or_default();
            (previous_value != new).then_some(previous_value)
        };

        if let Some(had_value) = had_value {
            self.journal
                .last_mut()
                .unwrap()
                .push(JournalEntry::TransientStorageChange {
                    address,
                    key,
                    had_value,
                });
        }
    }

    /// Pushes a log into the logs buffer.
    #[inline]
    pub fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    /// Finalizes the transaction: returns the changed state and the logs,
    /// resetting the per-transaction buffers.
    ///
    /// Only touched accounts are part of the change set, and touched empty
    /// accounts are cleared per EIP-161 (Spurious Dragon+).
    #[inline]
    pub fn finalize(&mut self) -> (EvmState, Vec<Log>) {
        let is_spurious_dragon_enabled = self.spec.is_enabled_in(SPURIOUS_DRAGON);
        self.transient_storage.clear();
        self.journal = vec![vec![]];
        self.depth = 0;
        let mut state = mem::take(&mut self.state);
        state.retain(|_, account| {
            account.is_touched() && !(is_spurious_dragon_enabled && account.is_empty())
        });
        let logs = mem::take(&mut self.logs);
        (state, logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EmptyDB;
    use primitives::AccountInfo;

    fn setup() -> (JournaledState, EmptyDB) {
        (
            JournaledState::new(SpecId::CANCUN, HashSet::default()),
            EmptyDB::default(),
        )
    }

    fn fund(journal: &mut JournaledState, address: Address, balance: u64) {
        journal.state.insert(
            address,
            Account::from(AccountInfo::from_balance(U256::from(balance))),
        );
    }

    #[test]
    fn empty_checkpoint_revert_is_noop() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);
        journal.load_account(address, &mut db).unwrap();

        let snapshot = journal.clone();
        let checkpoint = journal.checkpoint();
        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal, snapshot);
    }

    #[test]
    fn warm_cold_roundtrip_across_revert() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);

        let checkpoint = journal.checkpoint();
        let (_, is_cold) = journal.load_account(address, &mut db).unwrap();
        assert!(is_cold);
        let (_, is_cold) = journal.load_account(address, &mut db).unwrap();
        assert!(!is_cold);

        journal.checkpoint_revert(checkpoint);
        // The enclosing revert restores the cold status.
        let checkpoint = journal.checkpoint();
        let (_, is_cold) = journal.load_account(address, &mut db).unwrap();
        assert!(is_cold);
        journal.checkpoint_commit();
        let _ = checkpoint;
    }

    #[test]
    fn transfer_moves_balance_and_reverts() {
        let (mut journal, mut db) = setup();
        let from = Address::with_last_byte(1);
        let to = Address::with_last_byte(2);
        fund(&mut journal, from, 100);

        let checkpoint = journal.checkpoint();
        assert_eq!(
            journal.transfer(&from, &to, U256::from(40), &mut db).unwrap(),
            None
        );
        assert_eq!(journal.account(from).info.balance, U256::from(60));
        assert_eq!(journal.account(to).info.balance, U256::from(40));

        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.account(from).info.balance, U256::from(100));
    }

    #[test]
    fn transfer_out_of_funds() {
        let (mut journal, mut db) = setup();
        let from = Address::with_last_byte(1);
        let to = Address::with_last_byte(2);
        fund(&mut journal, from, 10);
        assert_eq!(
            journal.transfer(&from, &to, U256::from(40), &mut db).unwrap(),
            Some(TransferError::OutOfFunds)
        );
    }

    #[test]
    fn zero_value_transfer_touches_recipient() {
        let (mut journal, mut db) = setup();
        let from = Address::with_last_byte(1);
        let to = Address::with_last_byte(2);
        fund(&mut journal, from, 10);
        journal.transfer(&from, &to, U256::ZERO, &mut db).unwrap();
        assert!(journal.account(to).is_touched());
    }

    #[test]
    fn sstore_journal_roundtrip() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);
        fund(&mut journal, address, 0);
        let key = U256::from(7);

        let checkpoint = journal.checkpoint();
        let result = journal.sstore(address, key, U256::from(9), &mut db).unwrap();
        assert!(result.is_cold);
        assert_eq!(result.original_value, U256::ZERO);
        assert_eq!(journal.sload(address, key, &mut db).unwrap(), (U256::from(9), false));

        journal.checkpoint_revert(checkpoint);
        // Value restored and slot cold again.
        let checkpoint = journal.checkpoint();
        assert_eq!(journal.sload(address, key, &mut db).unwrap(), (U256::ZERO, true));
        journal.checkpoint_commit();
        let _ = checkpoint;
    }

    #[test]
    fn sstore_same_value_is_not_journaled() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);
        fund(&mut journal, address, 0);
        let key = U256::from(7);

        journal.sload(address, key, &mut db).unwrap();
        let entries = journal.journal.last().unwrap().len();
        journal.sstore(address, key, U256::ZERO, &mut db).unwrap();
        assert_eq!(journal.journal.last().unwrap().len(), entries);
    }

    #[test]
    fn tstore_revert_restores_previous() {
        let (mut journal, _) = setup();
        let address = Address::with_last_byte(1);
        let key = U256::from(1);

        journal.tstore(address, key, U256::from(5));
        let checkpoint = journal.checkpoint();
        journal.tstore(address, key, U256::from(6));
        journal.tstore(address, key, U256::ZERO);
        assert_eq!(journal.tload(address, key), U256::ZERO);

        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.tload(address, key), U256::from(5));
    }

    #[test]
    fn nonce_increment_and_revert() {
        let (mut journal, _) = setup();
        let address = Address::with_last_byte(1);
        fund(&mut journal, address, 0);

        let checkpoint = journal.checkpoint();
        assert_eq!(journal.inc_nonce(address), Some(1));
        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.account(address).info.nonce, 0);
    }

    #[test]
    fn create_collision_on_nonzero_nonce() {
        let (mut journal, mut db) = setup();
        let caller = Address::with_last_byte(1);
        let target = Address::with_last_byte(2);
        fund(&mut journal, caller, 100);
        journal.state.insert(
            target,
            Account::from(AccountInfo {
                nonce: 1,
                ..Default::default()
            }),
        );
        journal.load_account(target, &mut db).unwrap();

        assert_eq!(
            journal.create_account_checkpoint(caller, target, U256::ZERO, SpecId::CANCUN),
            Err(TransferError::CreateCollision)
        );
    }

    #[test]
    fn created_account_revert_recolds_storage() {
        let (mut journal, mut db) = setup();
        let caller = Address::with_last_byte(1);
        let target = Address::with_last_byte(2);
        fund(&mut journal, caller, 100);
        journal.load_account(target, &mut db).unwrap();

        let checkpoint = journal
            .create_account_checkpoint(caller, target, U256::from(10), SpecId::CANCUN)
            .unwrap();
        assert_eq!(journal.account(target).info.nonce, 1);
        journal.sstore(target, U256::from(1), U256::from(2), &mut db).unwrap();

        journal.checkpoint_revert(checkpoint);
        let account = journal.account(target);
        assert!(!account.is_created());
        assert_eq!(account.info.nonce, 0);
        assert_eq!(journal.account(caller).info.balance, U256::from(100));
    }

    #[test]
    fn selfdestruct_moves_balance() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);
        let target = Address::with_last_byte(2);
        fund(&mut journal, address, 100);
        journal.load_account(address, &mut db).unwrap();

        // Pre-Cancun: always destroys.
        journal.spec = SpecId::SHANGHAI;
        let result = journal.selfdestruct(address, target, &mut db).unwrap();
        assert!(result.had_value);
        assert!(!result.previously_destroyed);
        assert!(journal.account(address).is_selfdestructed());
        assert_eq!(journal.account(target).info.balance, U256::from(100));
    }

    #[test]
    fn cancun_selfdestruct_only_transfers() {
        let (mut journal, mut db) = setup();
        let address = Address::with_last_byte(1);
        let target = Address::with_last_byte(2);
        fund(&mut journal, address, 100);
        journal.load_account(address, &mut db).unwrap();

        let result = journal.selfdestruct(address, target, &mut db).unwrap();
        assert!(result.had_value);
        assert!(!journal.account(address).is_selfdestructed());
        assert_eq!(journal.account(target).info.balance, U256::from(100));
    }

    #[test]
    fn logs_truncated_on_revert() {
        let (mut journal, _) = setup();
        journal.log(Log::default());
        let checkpoint = journal.checkpoint();
        journal.log(Log::default());
        journal.log(Log::default());
        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.logs.len(), 1);
    }
}
