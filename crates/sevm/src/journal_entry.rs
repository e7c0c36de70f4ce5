use primitives::{Address, EvmState, TransientStorage, KECCAK_EMPTY, U256};

/// The 0x03 (RIPEMD-160) precompile address, special-cased on touch revert.
const PRECOMPILE3: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3,
]);

/// A record of the exact undo needed to revert one state mutation.
///
/// Entries are appended in the order the interpreter produced the mutations
/// and reverted in strict reverse order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JournalEntry {
    /// Used to mark an account that is warm inside the EVM with regard to
    /// the EIP-2929 access list.
    /// Revert: we mark the account as cold again.
    AccountWarmed { address: Address },
    /// Mark an account to be destroyed and journal the balance to be
    /// reverted.
    /// Revert: unmark the account and transfer the balance back.
    AccountDestroyed {
        address: Address,
        target: Address,
        was_destroyed: bool,
        had_balance: U256,
    },
    /// Loading an account does not mean that the account will need to be
    /// saved to the database (touched); only when the account is called or a
    /// balance is transferred it is.
    /// Revert: unmark the account as touched.
    AccountTouched { address: Address },
    /// Balance transferred between two accounts.
    /// Revert: transfer the balance back.
    BalanceTransfer {
        from: Address,
        to: Address,
        balance: U256,
    },
    /// Nonce was incremented by one.
    /// Revert: decrement the nonce.
    NonceChange { address: Address },
    /// The account was created inside this transaction.
    /// Revert: unmark created, reset the nonce, re-cold the storage.
    AccountCreated { address: Address },
    /// A storage slot changed its value.
    /// Revert: restore the previous value.
    StorageChanged {
        address: Address,
        key: U256,
        had_value: U256,
    },
    /// A storage slot was warmed by SLOAD or SSTORE (EIP-2929).
    /// Revert: mark it cold again.
    StorageWarmed { address: Address, key: U256 },
    /// An EIP-1153 transient storage slot changed its value.
    /// Revert: restore the previous value.
    TransientStorageChange {
        address: Address,
        key: U256,
        had_value: U256,
    },
    /// Code of an account changed.
    /// Revert: clear the code and reset the hash to the empty hash.
    CodeChange { address: Address },
}

impl JournalEntry {
    /// Reverts the state change recorded by this entry.
    ///
    /// The Spurious Dragon flag controls the 0x03 touch quirk: at the fork
    /// block a failed call left the RIPEMD precompile touched, so the touch
    /// of that address survives reverts. See [EIP-issue #716](https://github.com/ethereum/EIPs/issues/716).
    pub fn revert(
        self,
        state: &mut EvmState,
        transient_storage: &mut TransientStorage,
        is_spurious_dragon_enabled: bool,
    ) {
        match self {
            JournalEntry::AccountWarmed { address } => {
                state.get_mut(&address).unwrap().mark_cold();
            }
            JournalEntry::AccountTouched { address } => {
                if is_spurious_dragon_enabled && address == PRECOMPILE3 {
                    return;
                }
                state.get_mut(&address).unwrap().unmark_touch();
            }
            JournalEntry::AccountDestroyed {
                address,
                target,
                was_destroyed,
                had_balance,
            } => {
                let account = state.get_mut(&address).unwrap();
                // There could be multiple selfdestructs in one transaction;
                // restore the flag the account carried before this one.
                if was_destroyed {
                    account.mark_selfdestruct();
                } else {
                    account.unmark_selfdestruct();
                }
                account.info.balance += had_balance;

                if address != target {
                    let target = state.get_mut(&target).unwrap();
                    target.info.balance -= had_balance;
                }
            }
            JournalEntry::BalanceTransfer { from, to, balance } => {
                // No overflow checks needed; the forward transfer was checked.
                let from = state.get_mut(&from).unwrap();
                from.info.balance += balance;
                let to = state.get_mut(&to).unwrap();
                to.info.balance -= balance;
            }
            JournalEntry::NonceChange { address } => {
                state.get_mut(&address).unwrap().info.nonce -= 1;
            }
            JournalEntry::AccountCreated { address } => {
                let account = state.get_mut(&address).unwrap();
                account.unmark_created();
                // Only an account with nonce zero can be created, so this is
                // the pre-create value.
                account.info.nonce = 0;
                // Slots warmed inside the created account's constructor go
                // back to cold together with the account.
                account
                    .storage
                    .values_mut()
                    .for_each(|slot| slot.mark_cold());
            }
            JournalEntry::StorageWarmed { address, key } => {
                state
                    .get_mut(&address)
                    .unwrap()
                    .storage
                    .get_mut(&key)
                    .unwrap()
                    .mark_cold();
            }
            JournalEntry::StorageChanged {
                address,
                key,
                had_value,
            } => {
                state
                    .get_mut(&address)
                    .unwrap()
                    .storage
                    .get_mut(&key)
                    .unwrap()
                    .present_value = had_value;
            }
            JournalEntry::TransientStorageChange {
                address,
                key,
                had_value,
            } => {
                let key = (address, key);
                if had_value.is_zero() {
                    transient_storage.remove(&key);
                } else {
                    transient_storage.insert(key, had_value);
                }
            }
            JournalEntry::CodeChange { address } => {
                let account = state.get_mut(&address).unwrap();
                account.info.code_hash = KECCAK_EMPTY;
                account.info.code = None;
            }
        }
    }
}

/// A marker in the journal (and logs) to which the state can be rolled back
/// atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalCheckpoint {
    /// Length of the logs buffer when the checkpoint was taken.
    pub log_i: usize,
    /// Number of journal segments when the checkpoint was taken.
    pub journal_i: usize,
}
