//! # sevm-precompile
//!
//! Built-in contracts at the low addresses `0x01..=0x05`: ECRECOVER, SHA256,
//! RIPEMD160, IDENTITY and MODEXP, with fork-gated pricing.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod hash;
mod identity;
mod modexp;
mod secp256k1;
pub mod utilities;

use core::fmt;
use once_cell::sync::OnceCell;
use primitives::{Address, Bytes, HashMap, SpecId as EvmSpecId};

/// A precompile operation result type.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// The output of a precompile execution: the gas it used and its returned
/// bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Gas used by the precompile.
    pub gas_used: u64,
    /// Output bytes.
    pub bytes: Bytes,
}

impl PrecompileOutput {
    /// Returns a new precompile output with the given gas used and output bytes.
    pub fn new(gas_used: u64, bytes: Bytes) -> Self {
        Self { gas_used, bytes }
    }
}

/// A precompile function pointer.
pub type PrecompileFn = fn(&[u8], u64) -> PrecompileResult;

/// Precompile errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrecompileError {
    /// The precompile needed more gas than was forwarded to it.
    OutOfGas,
    /// The modexp exponent length overflows the pricing arithmetic.
    ModexpExpOverflow,
    /// The modexp base length overflows the pricing arithmetic.
    ModexpBaseOverflow,
    /// The modexp modulus length overflows the pricing arithmetic.
    ModexpModOverflow,
}

#[cfg(feature = "std")]
impl std::error::Error for PrecompileError {}

impl fmt::Display for PrecompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfGas => "out of gas",
            Self::ModexpExpOverflow => "modexp exp overflow",
            Self::ModexpBaseOverflow => "modexp base overflow",
            Self::ModexpModOverflow => "modexp mod overflow",
        };
        f.write_str(s)
    }
}

impl PrecompileError {
    /// Returns `true` if the error is out of gas.
    pub fn is_oog(&self) -> bool {
        matches!(self, Self::OutOfGas)
    }
}

/// A precompile together with its address.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<PrecompileWithAddress> for (Address, PrecompileFn) {
    fn from(value: PrecompileWithAddress) -> Self {
        (value.0, value.1)
    }
}

/// The fork tiers of the precompile set.
///
/// Only the forks that changed the set (or its pricing) are named.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SpecId {
    HOMESTEAD,
    BYZANTIUM,
    BERLIN,
    LATEST,
}

impl SpecId {
    /// Returns the precompile tier for the primitive [`EvmSpecId`].
    pub const fn from_spec_id(spec_id: EvmSpecId) -> Self {
        use EvmSpecId::*;
        match spec_id {
            FRONTIER | FRONTIER_THAWING | HOMESTEAD | DAO_FORK | TANGERINE | SPURIOUS_DRAGON => {
                Self::HOMESTEAD
            }
            BYZANTIUM | CONSTANTINOPLE | PETERSBURG | ISTANBUL | MUIR_GLACIER => Self::BYZANTIUM,
            BERLIN | LONDON | ARROW_GLACIER | GRAY_GLACIER | MERGE | SHANGHAI | CANCUN | PRAGUE => {
                Self::BERLIN
            }
            LATEST => Self::LATEST,
        }
    }
}

/// The set of precompiles active for a fork tier.
#[derive(Clone, Debug, Default)]
pub struct Precompiles {
    /// Precompiles, keyed by address.
    inner: HashMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// Returns the precompile set for Homestead.
    pub fn homestead() -> &'static Self {
        static INSTANCE: OnceCell<Precompiles> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Precompiles::default();
            precompiles.extend([
                secp256k1::ECRECOVER,
                hash::SHA256,
                hash::RIPEMD160,
                identity::FUN,
            ]);
            precompiles
        })
    }

    /// Returns the precompile set for Byzantium.
    pub fn byzantium() -> &'static Self {
        static INSTANCE: OnceCell<Precompiles> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::homestead().clone();
            precompiles.extend([
                // EIP-198: Big integer modular exponentiation.
                modexp::BYZANTIUM,
            ]);
            precompiles
        })
    }

    /// Returns the precompile set for Berlin.
    pub fn berlin() -> &'static Self {
        static INSTANCE: OnceCell<Precompiles> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::byzantium().clone();
            precompiles.extend([
                // EIP-2565: ModExp gas cost.
                modexp::BERLIN,
            ]);
            precompiles
        })
    }

    /// Returns the latest precompile set.
    pub fn latest() -> &'static Self {
        Self::berlin()
    }

    /// Returns the precompile set for the given tier.
    pub fn new(spec: SpecId) -> &'static Self {
        match spec {
            SpecId::HOMESTEAD => Self::homestead(),
            SpecId::BYZANTIUM => Self::byzantium(),
            SpecId::BERLIN => Self::berlin(),
            SpecId::LATEST => Self::latest(),
        }
    }

    /// Returns an iterator over the precompile addresses.
    #[inline]
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.inner.keys()
    }

    /// Returns `true` if the address is a precompile.
    #[inline]
    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    /// Returns the precompile at the given address.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<PrecompileFn> {
        self.inner.get(address).copied()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of precompiles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Extends the set with the given precompiles.
    pub fn extend(&mut self, other: impl IntoIterator<Item = PrecompileWithAddress>) {
        self.inner
            .extend(other.into_iter().map(Into::<(Address, PrecompileFn)>::into));
    }
}

/// Const helper for making an address from the last `u64` of it.
pub const fn u64_to_address(x: u64) -> Address {
    let x = x.to_be_bytes();
    Address::new([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7],
    ])
}

/// Calculates the linear cost of a precompile over the input length:
/// `base + word * ceil(len / 32)`.
pub fn calc_linear_cost_u32(len: usize, base: u64, word: u64) -> u64 {
    (len as u64).div_ceil(32) * word + base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fork_tiers() {
        assert_eq!(Precompiles::homestead().len(), 4);
        assert_eq!(Precompiles::byzantium().len(), 5);
        assert_eq!(Precompiles::berlin().len(), 5);
        assert!(Precompiles::berlin().contains(&u64_to_address(5)));
        assert!(!Precompiles::homestead().contains(&u64_to_address(5)));
    }

    #[test]
    fn tier_from_spec_id() {
        assert_eq!(
            SpecId::from_spec_id(EvmSpecId::FRONTIER),
            SpecId::HOMESTEAD
        );
        assert_eq!(
            SpecId::from_spec_id(EvmSpecId::ISTANBUL),
            SpecId::BYZANTIUM
        );
        assert_eq!(SpecId::from_spec_id(EvmSpecId::CANCUN), SpecId::BERLIN);
    }

    #[test]
    fn linear_cost() {
        assert_eq!(calc_linear_cost_u32(0, 60, 12), 60);
        assert_eq!(calc_linear_cost_u32(32, 60, 12), 72);
        assert_eq!(calc_linear_cost_u32(33, 60, 12), 84);
    }
}
