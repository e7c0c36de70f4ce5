use crate::{
    calc_blob_gasprice, Account, InvalidHeader, InvalidTransaction, Spec, SpecId, GAS_PER_BLOB,
    MAX_BLOB_NUMBER_PER_BLOCK, MAX_CODE_SIZE, MAX_INITCODE_SIZE, VERSIONED_HASH_VERSION_KZG,
};
use alloc::{boxed::Box, vec::Vec};
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use core::cmp::{min, Ordering};

/// EVM environment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env {
    /// Configuration of the EVM itself.
    pub cfg: CfgEnv,
    /// Configuration of the block the transaction is in.
    pub block: BlockEnv,
    /// Configuration of the transaction that is being executed.
    pub tx: TxEnv,
}

impl Env {
    /// Resets environment to default values.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Create boxed [Env].
    #[inline]
    pub fn boxed(cfg: CfgEnv, block: BlockEnv, tx: TxEnv) -> Box<Self> {
        Box::new(Self { cfg, block, tx })
    }

    /// Calculates the effective gas price of the transaction.
    #[inline]
    pub fn effective_gas_price(&self) -> U256 {
        if let Some(priority_fee) = self.tx.gas_priority_fee {
            min(self.tx.gas_price, self.block.basefee + priority_fee)
        } else {
            self.tx.gas_price
        }
    }

    /// Calculates the [EIP-4844] `data_fee` of the transaction.
    ///
    /// Returns `None` if `Cancun` is not enabled. This is enforced in
    /// [`Env::validate_block_env`].
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    #[inline]
    pub fn calc_data_fee(&self) -> Option<U256> {
        self.block.get_blob_gasprice().map(|blob_gasprice| {
            U256::from(blob_gasprice).saturating_mul(U256::from(self.tx.get_total_blob_gas()))
        })
    }

    /// Calculates the maximum [EIP-4844] `data_fee` of the transaction.
    ///
    /// This is used for ensuring that the user has at least enough funds to pay
    /// `max_fee_per_blob_gas * total_blob_gas`, on top of regular gas costs.
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    pub fn calc_max_data_fee(&self) -> Option<U256> {
        self.tx.max_fee_per_blob_gas.map(|max_fee_per_blob_gas| {
            max_fee_per_blob_gas.saturating_mul(U256::from(self.tx.get_total_blob_gas()))
        })
    }

    /// Validates the block environment.
    #[inline]
    pub fn validate_block_env<SPEC: Spec>(&self) -> Result<(), InvalidHeader> {
        // `prevrandao` is required for the merge
        if SPEC::enabled(SpecId::MERGE) && self.block.prevrandao.is_none() {
            return Err(InvalidHeader::PrevrandaoNotSet);
        }
        // `excess_blob_gas` is required for Cancun
        if SPEC::enabled(SpecId::CANCUN) && self.block.blob_excess_gas_and_price.is_none() {
            return Err(InvalidHeader::ExcessBlobGasNotSet);
        }
        Ok(())
    }

    /// Validates the transaction fields against the config and block and
    /// returns an error if something is wrong.
    #[inline]
    pub fn validate_tx<SPEC: Spec>(&self) -> Result<(), InvalidTransaction> {
        // Fork gate of the transaction type itself.
        match self.tx.tx_type {
            TransactionType::Legacy => {}
            TransactionType::Eip2930 => {
                if !SPEC::enabled(SpecId::BERLIN) {
                    return Err(InvalidTransaction::TxTypeNotSupported);
                }
            }
            TransactionType::Eip1559 => {
                if !SPEC::enabled(SpecId::LONDON) {
                    return Err(InvalidTransaction::TxTypeNotSupported);
                }
            }
            TransactionType::Eip4844 => {
                if !SPEC::enabled(SpecId::CANCUN) {
                    return Err(InvalidTransaction::TxTypeNotSupported);
                }
            }
        }

        // Check if the transaction's chain id is correct
        if let Some(tx_chain_id) = self.tx.chain_id {
            if tx_chain_id != self.cfg.chain_id {
                return Err(InvalidTransaction::InvalidChainId);
            }
        }

        // Check if gas_limit is more than block_gas_limit
        if !self.cfg.disable_block_gas_limit
            && U256::from(self.tx.gas_limit) > self.block.gas_limit
        {
            return Err(InvalidTransaction::CallerGasLimitMoreThanBlock);
        }

        // Check that access list is empty for transactions before BERLIN
        if !SPEC::enabled(SpecId::BERLIN) && !self.tx.access_list.is_empty() {
            return Err(InvalidTransaction::AccessListNotSupported);
        }

        // BASEFEE tx check
        if SPEC::enabled(SpecId::LONDON) {
            if let Some(priority_fee) = self.tx.gas_priority_fee {
                if priority_fee > self.tx.gas_price {
                    // or gas_max_fee for eip1559
                    return Err(InvalidTransaction::PriorityFeeGreaterThanMaxFee);
                }
            }

            // check minimal cost against basefee
            if !self.cfg.disable_base_fee && self.effective_gas_price() < self.block.basefee {
                return Err(InvalidTransaction::GasPriceLessThanBasefee);
            }
        }

        // EIP-3860: Limit and meter initcode
        if SPEC::enabled(SpecId::SHANGHAI) && self.tx.transact_to.is_create() {
            let max_initcode_size = self
                .cfg
                .limit_contract_code_size
                .map(|limit| limit.saturating_mul(2))
                .unwrap_or(MAX_INITCODE_SIZE);
            if self.tx.data.len() > max_initcode_size {
                return Err(InvalidTransaction::CreateInitCodeSizeLimit);
            }
        }

        // Before Cancun, `blob_hashes` and `max_fee_per_blob_gas` must be
        // empty / not set.
        if !SPEC::enabled(SpecId::CANCUN)
            && (self.tx.max_fee_per_blob_gas.is_some() || !self.tx.blob_hashes.is_empty())
        {
            return Err(InvalidTransaction::BlobVersionedHashesNotSupported);
        }

        // Presence of max_fee_per_blob_gas means that this is a blob transaction.
        if let Some(max) = self.tx.max_fee_per_blob_gas {
            // ensure that the user was willing to at least pay the current blob gasprice
            let price = self.block.get_blob_gasprice().expect("already checked");
            if U256::from(price) > max {
                return Err(InvalidTransaction::BlobGasPriceGreaterThanMax);
            }

            // there must be at least one blob
            if self.tx.blob_hashes.is_empty() {
                return Err(InvalidTransaction::EmptyBlobs);
            }

            // The field `to` deviates slightly from the semantics with the
            // exception that it MUST NOT be nil and therefore must always
            // represent a 20-byte address. Blob transactions cannot have the
            // form of a create transaction.
            if self.tx.transact_to.is_create() {
                return Err(InvalidTransaction::BlobCreateTransaction);
            }

            // all versioned blob hashes must start with VERSIONED_HASH_VERSION_KZG
            for blob in self.tx.blob_hashes.iter() {
                if blob[0] != VERSIONED_HASH_VERSION_KZG {
                    return Err(InvalidTransaction::BlobVersionNotSupported);
                }
            }

            // ensure the total blob gas spent is at most equal to the limit
            let num_blobs = self.tx.blob_hashes.len();
            if num_blobs > MAX_BLOB_NUMBER_PER_BLOCK as usize {
                return Err(InvalidTransaction::TooManyBlobs {
                    max: MAX_BLOB_NUMBER_PER_BLOCK as usize,
                    have: num_blobs,
                });
            }
        } else {
            // if max_fee_per_blob_gas is not set, then blob_hashes must be empty
            if !self.tx.blob_hashes.is_empty() {
                return Err(InvalidTransaction::BlobVersionedHashesNotSupported);
            }
        }

        Ok(())
    }

    /// Validates the transaction against the state of the sender account.
    #[inline]
    pub fn validate_tx_against_state(
        &self,
        account: &mut Account,
    ) -> Result<(), InvalidTransaction> {
        // EIP-3607: Reject transactions from senders with deployed code
        // This EIP is introduced after london but there was no collision in the
        // past so we can leave it enabled always.
        if !self.cfg.disable_eip3607 && !account.info.is_empty_code_hash() {
            return Err(InvalidTransaction::RejectCallerWithCode);
        }

        // Check that the transaction's nonce is correct
        if let Some(tx) = self.tx.nonce {
            let state = account.info.nonce;
            match tx.cmp(&state) {
                Ordering::Greater => {
                    return Err(InvalidTransaction::NonceTooHigh { tx, state });
                }
                Ordering::Less => {
                    return Err(InvalidTransaction::NonceTooLow { tx, state });
                }
                _ => {}
            }
        }

        let mut balance_check = U256::from(self.tx.gas_limit)
            .checked_mul(self.tx.gas_price)
            .and_then(|gas_cost| gas_cost.checked_add(self.tx.value))
            .ok_or(InvalidTransaction::OverflowPaymentInTransaction)?;

        // EIP-4844: the max blob fee is subtracted up front and refunded for
        // the unused part after execution.
        if let Some(data_fee) = self.calc_max_data_fee() {
            balance_check = balance_check
                .checked_add(data_fee)
                .ok_or(InvalidTransaction::OverflowPaymentInTransaction)?;
        }

        // Check if account has enough balance for gas_limit*gas_price and value
        // transfer. Transfer will be done inside the driver.
        if balance_check > account.info.balance {
            if self.cfg.disable_balance_check {
                // Add transaction cost to balance to ensure execution doesn't fail.
                account.info.balance = balance_check;
            } else {
                return Err(InvalidTransaction::LackOfFundForMaxFee {
                    fee: Box::new(balance_check),
                    balance: Box::new(account.info.balance),
                });
            }
        }

        Ok(())
    }
}

/// What bytecode analysis to perform on loaded and deployed code.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalysisKind {
    /// Do not perform bytecode analysis; code is analyzed lazily when executed.
    Raw,
    /// Perform bytecode analysis.
    #[default]
    Analyse,
}

/// EVM configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgEnv {
    /// Chain ID of the EVM. It will be compared to the transaction's chain ID.
    ///
    /// Chain ID was introduced by EIP-155.
    pub chain_id: u64,
    /// The active hardfork.
    pub spec_id: SpecId,
    /// Whether bytecode installed by CREATE/CREATE2 is analyzed up front.
    /// Analysis speeds up repeated execution of the deployed code.
    pub perf_analyse_created_bytecodes: AnalysisKind,
    /// If some, it effects EIP-170: contract code size limit. Useful to
    /// increase for tests. By default it is `0x6000` (~25kb).
    pub limit_contract_code_size: Option<usize>,
    /// A hard memory limit in bytes beyond which the interpreter memory
    /// cannot be resized.
    ///
    /// Defaults to `2^32 - 1` bytes, per EIP-1985.
    pub memory_limit: u64,
    /// Skip balance checks if true. Adds transaction cost to balance to ensure
    /// execution doesn't fail.
    pub disable_balance_check: bool,
    /// There are use cases where it's allowed to provide a gas limit that's
    /// higher than the block's gas limit.
    pub disable_block_gas_limit: bool,
    /// EIP-3607 rejects transactions from senders with deployed code. In
    /// development, it can be desirable to simulate calls from contracts,
    /// which this setting allows.
    pub disable_eip3607: bool,
    /// Disables all gas refunds. This is useful when using chains that have
    /// gas refunds disabled, e.g. Avalanche. Reasoning behind removing gas
    /// refunds can be found in EIP-3298.
    pub disable_gas_refund: bool,
    /// Disables base fee checks for EIP-1559 transactions. This is useful for
    /// testing method calls with zero gas price.
    pub disable_base_fee: bool,
    /// Disables the payout of the gas reward to the block beneficiary.
    pub disable_beneficiary_reward: bool,
}

impl CfgEnv {
    /// Returns max code size from [`Self::limit_contract_code_size`] if set,
    /// or the default [`MAX_CODE_SIZE`] value.
    pub fn max_code_size(&self) -> usize {
        self.limit_contract_code_size.unwrap_or(MAX_CODE_SIZE)
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_spec_id(mut self, spec_id: SpecId) -> Self {
        self.spec_id = spec_id;
        self
    }
}

impl Default for CfgEnv {
    fn default() -> Self {
        Self {
            chain_id: 1,
            spec_id: SpecId::LATEST,
            perf_analyse_created_bytecodes: AnalysisKind::default(),
            limit_contract_code_size: None,
            memory_limit: (1 << 32) - 1,
            disable_balance_check: false,
            disable_block_gas_limit: false,
            disable_eip3607: false,
            disable_gas_refund: false,
            disable_base_fee: false,
            disable_beneficiary_reward: false,
        }
    }
}

/// The block environment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// The number of ancestor blocks of this block (block height).
    pub number: U256,
    /// Coinbase or miner or address that created and signed the block.
    ///
    /// This is the receiver address of all the gas spent in the block.
    pub coinbase: Address,
    /// The timestamp of the block in seconds since the UNIX epoch.
    pub timestamp: U256,
    /// The gas limit of the block.
    pub gas_limit: U256,
    /// The base fee per gas, added in the London upgrade with [EIP-1559].
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub basefee: U256,
    /// The difficulty of the block.
    ///
    /// Unused after the Paris (AKA the merge) upgrade, and replaced by
    /// `prevrandao`.
    pub difficulty: U256,
    /// The output of the randomness beacon provided by the beacon chain.
    ///
    /// Replaces `difficulty` after the Paris upgrade with [EIP-4399].
    ///
    /// [EIP-4399]: https://eips.ethereum.org/EIPS/eip-4399
    pub prevrandao: Option<B256>,
    /// Excess blob gas and blob gasprice, incorporated as part of the Cancun
    /// upgrade via [EIP-4844].
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    pub blob_excess_gas_and_price: Option<BlobExcessGasAndPrice>,
}

impl BlockEnv {
    /// Takes `blob_excess_gas`, saves it inside env and calculates the blob
    /// gas price from it.
    pub fn set_blob_excess_gas_and_price(&mut self, excess_blob_gas: u64) {
        self.blob_excess_gas_and_price = Some(BlobExcessGasAndPrice::new(excess_blob_gas));
    }

    /// Returns the blob gas price of the block, if any.
    ///
    /// `None` means Cancun is not enabled; this is enforced in
    /// [`Env::validate_block_env`].
    #[inline]
    pub fn get_blob_gasprice(&self) -> Option<u128> {
        self.blob_excess_gas_and_price
            .as_ref()
            .map(|a| a.blob_gasprice)
    }

    /// Returns the `blob_excess_gas` header field, if any.
    #[inline]
    pub fn get_blob_excess_gas(&self) -> Option<u64> {
        self.blob_excess_gas_and_price
            .as_ref()
            .map(|a| a.excess_blob_gas)
    }
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: U256::ZERO,
            coinbase: Address::ZERO,
            timestamp: U256::from(1),
            gas_limit: U256::MAX,
            basefee: U256::ZERO,
            difficulty: U256::ZERO,
            prevrandao: Some(B256::ZERO),
            blob_excess_gas_and_price: Some(BlobExcessGasAndPrice::new(0)),
        }
    }
}

/// Structure holding the block's excess blob gas and the blob fee derived
/// from it, incorporated as part of the Cancun upgrade via [EIP-4844].
///
/// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobExcessGasAndPrice {
    /// The excess blob gas of the block.
    pub excess_blob_gas: u64,
    /// The calculated blob gas price based on `excess_blob_gas`.
    pub blob_gasprice: u128,
}

impl BlobExcessGasAndPrice {
    /// Creates a new instance by calculating the blob gas price from the
    /// excess blob gas.
    pub fn new(excess_blob_gas: u64) -> Self {
        Self {
            excess_blob_gas,
            blob_gasprice: calc_blob_gasprice(excess_blob_gas),
        }
    }
}

/// Transaction type of the in-memory transaction envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactionType {
    /// Legacy transaction type.
    #[default]
    Legacy,
    /// EIP-2930 access list transaction type, introduced in Berlin.
    Eip2930,
    /// EIP-1559 fee market transaction type, introduced in London.
    Eip1559,
    /// EIP-4844 blob transaction type, introduced in Cancun.
    Eip4844,
}

/// An address/storage-keys pair of the EIP-2930 access list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessListItem {
    /// Account address to warm up.
    pub address: Address,
    /// Storage keys of the account to warm up.
    pub storage_keys: Vec<U256>,
}

/// The transaction environment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEnv {
    /// Transaction type, used for the per-type validation ladder.
    pub tx_type: TransactionType,
    /// Caller aka author aka transaction signer.
    pub caller: Address,
    /// The gas limit of the transaction.
    pub gas_limit: u64,
    /// The gas price of the transaction.
    pub gas_price: U256,
    /// The destination of the transaction.
    pub transact_to: TxKind,
    /// The value sent to `transact_to`.
    pub value: U256,
    /// The data of the transaction.
    pub data: Bytes,
    /// The nonce of the transaction.
    ///
    /// Caution: if set to `None`, nonce validation against the account's
    /// nonce is skipped.
    pub nonce: Option<u64>,
    /// The chain ID of the transaction. If set to `None`, no checks are
    /// performed.
    ///
    /// Incorporated as part of the Spurious Dragon upgrade via [EIP-155].
    ///
    /// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
    pub chain_id: Option<u64>,
    /// A list of addresses and storage keys that the transaction plans to
    /// access, added in [EIP-2930].
    ///
    /// [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
    pub access_list: Vec<AccessListItem>,
    /// The priority fee per gas, incorporated as part of the London upgrade
    /// via [EIP-1559].
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub gas_priority_fee: Option<U256>,
    /// The list of blob versioned hashes. Per EIP there should be at least one
    /// blob present if [`Self::max_fee_per_blob_gas`] is `Some`.
    ///
    /// Incorporated as part of the Cancun upgrade via [EIP-4844].
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    pub blob_hashes: Vec<B256>,
    /// The max fee per blob gas, incorporated as part of the Cancun upgrade
    /// via [EIP-4844].
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    pub max_fee_per_blob_gas: Option<U256>,
}

impl TxEnv {
    /// Total blob gas of the transaction; see [EIP-4844].
    ///
    /// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
    #[inline]
    pub fn get_total_blob_gas(&self) -> u64 {
        GAS_PER_BLOB * self.blob_hashes.len() as u64
    }
}

impl Default for TxEnv {
    fn default() -> Self {
        Self {
            tx_type: TransactionType::Legacy,
            caller: Address::ZERO,
            gas_limit: u64::MAX,
            gas_price: U256::ZERO,
            gas_priority_fee: None,
            transact_to: TxKind::Call(Address::ZERO), // will do nothing
            value: U256::ZERO,
            data: Bytes::new(),
            chain_id: None,
            nonce: None,
            access_list: Vec::new(),
            blob_hashes: Vec::new(),
            max_fee_per_blob_gas: None,
        }
    }
}

/// Transaction destination.
pub type TransactTo = TxKind;

/// Create scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateScheme {
    /// Legacy create scheme of `CREATE`.
    Create,
    /// Create scheme of `CREATE2`.
    Create2 {
        /// Salt.
        salt: U256,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountInfo, LatestSpec};

    #[test]
    fn validate_tx_chain_id() {
        let mut env = Env::default();
        env.tx.chain_id = Some(1);
        env.cfg.chain_id = 2;
        assert_eq!(
            env.validate_tx::<LatestSpec>(),
            Err(InvalidTransaction::InvalidChainId)
        );
    }

    #[test]
    fn validate_tx_access_list_requires_berlin() {
        let mut env = Env::default();
        env.tx.access_list = vec![AccessListItem {
            address: Address::ZERO,
            storage_keys: vec![],
        }];
        assert_eq!(
            env.validate_tx::<crate::FrontierSpec>(),
            Err(InvalidTransaction::AccessListNotSupported)
        );
        assert_eq!(env.validate_tx::<crate::BerlinSpec>(), Ok(()));
    }

    #[test]
    fn validate_tx_type_gating() {
        let mut env = Env::default();
        env.tx.tx_type = TransactionType::Eip1559;
        assert_eq!(
            env.validate_tx::<crate::BerlinSpec>(),
            Err(InvalidTransaction::TxTypeNotSupported)
        );

        env.tx.tx_type = TransactionType::Eip4844;
        assert_eq!(
            env.validate_tx::<crate::ShanghaiSpec>(),
            Err(InvalidTransaction::TxTypeNotSupported)
        );
    }

    #[test]
    fn validate_tx_priority_fee() {
        let mut env = Env::default();
        env.tx.tx_type = TransactionType::Eip1559;
        env.tx.gas_price = U256::from(10);
        env.tx.gas_priority_fee = Some(U256::from(20));
        assert_eq!(
            env.validate_tx::<LatestSpec>(),
            Err(InvalidTransaction::PriorityFeeGreaterThanMaxFee)
        );
    }

    #[test]
    fn validate_tx_blob_version() {
        let mut env = Env::default();
        env.tx.tx_type = TransactionType::Eip4844;
        env.tx.max_fee_per_blob_gas = Some(U256::from(1));
        env.tx.blob_hashes = vec![B256::with_last_byte(1)];
        assert_eq!(
            env.validate_tx::<LatestSpec>(),
            Err(InvalidTransaction::BlobVersionNotSupported)
        );
    }

    #[test]
    fn validate_tx_against_state_nonce() {
        let mut env = Env::default();
        env.tx.nonce = Some(1);
        let mut account = Account::from(AccountInfo::default());
        assert_eq!(
            env.validate_tx_against_state(&mut account),
            Err(InvalidTransaction::NonceTooHigh { tx: 1, state: 0 })
        );
    }

    #[test]
    fn validate_tx_against_state_caller_with_code() {
        let env = Env::default();
        let mut account = Account::from(AccountInfo {
            code_hash: crate::keccak256([0x60, 0x00]),
            ..Default::default()
        });
        assert_eq!(
            env.validate_tx_against_state(&mut account),
            Err(InvalidTransaction::RejectCallerWithCode)
        );
    }

    #[test]
    fn effective_gas_price_takes_min() {
        let mut env = Env::default();
        env.tx.gas_price = U256::from(100);
        env.tx.gas_priority_fee = Some(U256::from(5));
        env.block.basefee = U256::from(50);
        assert_eq!(env.effective_gas_price(), U256::from(55));
    }
}
