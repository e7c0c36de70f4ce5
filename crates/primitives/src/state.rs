use crate::{EvmStorage, SpecId, KECCAK_EMPTY};
use alloy_primitives::{B256, U256};
use bitflags::bitflags;
use bytecode::Bytecode;
use hashbrown::HashMap;

/// An account loaded into the journaled state, together with its storage
/// cache and its per-transaction status flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    /// Balance, nonce and code.
    pub info: AccountInfo,
    /// Storage cache.
    pub storage: EvmStorage,
    /// Account status flags.
    pub status: AccountStatus,
}

bitflags! {
    /// Per-transaction account state flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AccountStatus: u8 {
        /// When account is loaded but not touched or interacted with.
        const Loaded = 0b00000000;
        /// When account is newly created we will not access database
        /// to fetch storage values.
        const Created = 0b00000001;
        /// If account is marked for self destruct.
        const SelfDestructed = 0b00000010;
        /// Only when account is marked as touched we will save it to database.
        const Touched = 0b00000100;
        /// Used only for pre-Spurious-Dragon hardforks where existing and empty
        /// were two separate states. It became the same state after
        /// EIP-161: State trie clearing.
        const LoadedAsNotExisting = 0b00001000;
        /// Account is cold with regard to EIP-2929 access tracking.
        const Cold = 0b00010000;
    }
}

impl Account {
    /// Creates an account that was not found in the database.
    pub fn new_not_existing() -> Self {
        Self {
            info: AccountInfo::default(),
            storage: HashMap::default(),
            status: AccountStatus::LoadedAsNotExisting,
        }
    }

    /// Marks the account as self destructed.
    pub fn mark_selfdestruct(&mut self) {
        self.status |= AccountStatus::SelfDestructed;
    }

    /// Unmarks the account as self destructed.
    pub fn unmark_selfdestruct(&mut self) {
        self.status -= AccountStatus::SelfDestructed;
    }

    /// Is account marked for self destruct.
    pub fn is_selfdestructed(&self) -> bool {
        self.status.contains(AccountStatus::SelfDestructed)
    }

    /// Marks the account as touched.
    pub fn mark_touch(&mut self) {
        self.status |= AccountStatus::Touched;
    }

    /// Unmarks the touched flag.
    pub fn unmark_touch(&mut self) {
        self.status -= AccountStatus::Touched;
    }

    /// If account status is marked as touched.
    pub fn is_touched(&self) -> bool {
        self.status.contains(AccountStatus::Touched)
    }

    /// Marks the account as newly created.
    pub fn mark_created(&mut self) {
        self.status |= AccountStatus::Created;
    }

    /// Unmarks the created flag.
    pub fn unmark_created(&mut self) {
        self.status -= AccountStatus::Created;
    }

    /// Is account newly created in this transaction.
    pub fn is_created(&self) -> bool {
        self.status.contains(AccountStatus::Created)
    }

    /// Is account loaded as not existing from database.
    pub fn is_loaded_as_not_existing(&self) -> bool {
        self.status.contains(AccountStatus::LoadedAsNotExisting)
    }

    /// Marks the account as cold.
    pub fn mark_cold(&mut self) {
        self.status |= AccountStatus::Cold;
    }

    /// Marks the account as warm and returns `true` if it was previously cold.
    pub fn mark_warm(&mut self) -> bool {
        if self.status.contains(AccountStatus::Cold) {
            self.status -= AccountStatus::Cold;
            true
        } else {
            false
        }
    }

    /// Is account empty: code hash is empty, balance and nonce are zero.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Returns `true` if the account is considered empty under the rules of
    /// the active spec.
    ///
    /// Pre Spurious Dragon an account loaded as not existing is the only
    /// "non existent" state; after it, any empty account counts.
    pub fn state_clear_aware_is_empty(&self, spec: SpecId) -> bool {
        if spec.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            self.is_empty()
        } else {
            self.is_loaded_as_not_existing() && !self.is_touched()
        }
    }
}

impl From<AccountInfo> for Account {
    fn from(info: AccountInfo) -> Self {
        Self {
            info,
            storage: HashMap::default(),
            status: AccountStatus::Loaded,
        }
    }
}

/// Balance, nonce and code of an account.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountInfo {
    /// Account balance.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Hash of the raw account code.
    pub code_hash: B256,
    /// Code. If `None`, `Database::code_by_hash` will be used to fetch it
    /// when the code needs to be loaded.
    pub code: Option<Bytecode>,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            nonce: 0,
            code_hash: KECCAK_EMPTY,
            code: Some(Bytecode::default()),
        }
    }
}

impl PartialEq for AccountInfo {
    fn eq(&self, other: &Self) -> bool {
        self.balance == other.balance
            && self.nonce == other.nonce
            && self.code_hash == other.code_hash
    }
}

impl AccountInfo {
    /// Creates a new account info with the given code.
    pub fn new(balance: U256, nonce: u64, code: Bytecode) -> Self {
        let code_hash = code.hash_slow();
        Self {
            balance,
            nonce,
            code: Some(code),
            code_hash,
        }
    }

    /// Creates an account with the given balance and no code.
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Returns the code hash, treating the zero hash as empty.
    pub fn code_hash(&self) -> B256 {
        self.code_hash
    }

    /// Is the code hash the hash of the empty string.
    pub fn is_empty_code_hash(&self) -> bool {
        self.code_hash == KECCAK_EMPTY || self.code_hash == B256::ZERO
    }

    /// An account is empty if balance and nonce are zero and it has no code.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.is_empty_code_hash()
    }

    /// Returns `true` if the account is non-empty.
    pub fn exists(&self) -> bool {
        !self.is_empty()
    }
}

/// A cached storage slot.
///
/// `original_value` is fixed at first load within a transaction and drives
/// the SSTORE gas/refund schedule; `present_value` tracks the live value;
/// `is_cold` drives EIP-2929 pricing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageSlot {
    /// The value of the slot when it was first loaded in this transaction.
    pub original_value: U256,
    /// The present value of the slot.
    pub present_value: U256,
    /// EIP-2929 access status of the slot.
    pub is_cold: bool,
}

impl StorageSlot {
    /// Creates a slot that was loaded from the database; cold by construction.
    pub fn new(original: U256) -> Self {
        Self {
            original_value: original,
            present_value: original,
            is_cold: true,
        }
    }

    /// Returns true if the present value differs from the original value.
    pub fn is_changed(&self) -> bool {
        self.original_value != self.present_value
    }

    pub fn original_value(&self) -> U256 {
        self.original_value
    }

    pub fn present_value(&self) -> U256 {
        self.present_value
    }

    /// Marks the slot as cold.
    pub fn mark_cold(&mut self) {
        self.is_cold = true;
    }

    /// Marks the slot as warm and returns `true` if it was previously cold.
    pub fn mark_warm(&mut self) -> bool {
        core::mem::replace(&mut self.is_cold, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_warm_cold_toggle() {
        let mut account = Account::default();
        account.mark_cold();
        assert!(account.mark_warm());
        assert!(!account.mark_warm());
        account.mark_cold();
        assert!(account.mark_warm());
    }

    #[test]
    fn account_touched_flags() {
        let mut account = Account::default();
        assert!(!account.is_touched());
        account.mark_touch();
        assert!(account.is_touched());
        account.unmark_touch();
        assert!(!account.is_touched());
    }

    #[test]
    fn empty_account_state_clear() {
        let account = Account::new_not_existing();
        assert!(account.state_clear_aware_is_empty(SpecId::SPURIOUS_DRAGON));
        assert!(account.state_clear_aware_is_empty(SpecId::HOMESTEAD));

        let funded = Account::from(AccountInfo::from_balance(U256::from(1)));
        assert!(!funded.state_clear_aware_is_empty(SpecId::SPURIOUS_DRAGON));
    }

    #[test]
    fn storage_slot_original_is_fixed() {
        let mut slot = StorageSlot::new(U256::from(7));
        assert!(slot.mark_warm());
        slot.present_value = U256::from(9);
        assert!(slot.is_changed());
        assert_eq!(slot.original_value(), U256::from(7));
    }
}
