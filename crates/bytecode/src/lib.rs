//! # sevm-bytecode
//!
//! EVM bytecode representation: the raw/analyzed variants, jump destination
//! analysis and the opcode constants.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod legacy;
pub mod opcode;

pub use legacy::{analyze_legacy, JumpTable, LegacyAnalyzedBytecode};
pub use opcode::OpCode;

use alloy_primitives::{keccak256, Bytes, B256};

/// State of the [`Bytecode`] analysis.
///
/// Analysis pads the code and computes the valid jump destinations, see
/// [`LegacyAnalyzedBytecode`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bytecode {
    /// Bytecode as loaded from the database, without analysis.
    Raw(Bytes),
    /// Analyzed bytecode, padded and with a jump table.
    Analyzed(LegacyAnalyzedBytecode),
}

impl Default for Bytecode {
    #[inline]
    fn default() -> Self {
        Self::Analyzed(LegacyAnalyzedBytecode::default())
    }
}

impl Bytecode {
    /// Creates a new raw [`Bytecode`].
    #[inline]
    pub fn new_raw(bytecode: Bytes) -> Self {
        Self::Raw(bytecode)
    }

    /// Creates a new analyzed [`Bytecode`].
    #[inline]
    pub fn new_analyzed(bytecode: LegacyAnalyzedBytecode) -> Self {
        Self::Analyzed(bytecode)
    }

    /// Returns `true` if the bytecode has been analyzed.
    #[inline]
    pub fn is_analyzed(&self) -> bool {
        matches!(self, Self::Analyzed(_))
    }

    /// Performs the jump destination analysis. Analysis is idempotent: an
    /// already analyzed bytecode is returned unchanged.
    pub fn into_analyzed(self) -> Self {
        match self {
            Self::Raw(bytes) => Self::Analyzed(analyze_legacy(&bytes)),
            analyzed => analyzed,
        }
    }

    /// Returns a reference to the executable byte buffer.
    ///
    /// For analyzed bytecode this is the padded buffer.
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        match self {
            Self::Raw(bytes) => bytes,
            Self::Analyzed(analyzed) => analyzed.bytecode(),
        }
    }

    /// Returns the original (unpadded) code.
    #[inline]
    pub fn original_byte_slice(&self) -> &[u8] {
        match self {
            Self::Raw(bytes) => bytes,
            Self::Analyzed(analyzed) => analyzed.original_byte_slice(),
        }
    }

    /// Returns the length of the original code.
    #[inline]
    pub fn len(&self) -> usize {
        self.original_byte_slice().len()
    }

    /// Returns `true` if the original code is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calculates the hash of the original code.
    #[inline]
    pub fn hash_slow(&self) -> B256 {
        if self.is_empty() {
            crate::KECCAK_EMPTY
        } else {
            keccak256(self.original_byte_slice())
        }
    }

    /// Returns the jump table, if the bytecode has been analyzed.
    #[inline]
    pub fn legacy_jump_table(&self) -> Option<&JumpTable> {
        match self {
            Self::Raw(_) => None,
            Self::Analyzed(analyzed) => Some(analyzed.jump_table()),
        }
    }
}

/// Keccak-256 hash of the empty byte string, duplicated here so that the
/// crate stays free of a dependency on the primitives crate.
pub(crate) const KECCAK_EMPTY: B256 = alloy_primitives::b256!(
    "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    fn analysis_is_idempotent() {
        let code = Bytes::from_static(&[opcode::PUSH1, 0x01, opcode::PUSH1, 0x02, opcode::ADD]);
        let analyzed = Bytecode::new_raw(code).into_analyzed();
        let again = analyzed.clone().into_analyzed();
        assert_eq!(analyzed, again);
    }

    #[test]
    fn hash_is_of_original_code() {
        let code = Bytes::from_static(&[opcode::PUSH1, 0x01]);
        let raw = Bytecode::new_raw(code.clone());
        let analyzed = raw.clone().into_analyzed();
        assert_eq!(raw.hash_slow(), keccak256(&code));
        assert_eq!(analyzed.hash_slow(), keccak256(&code));
    }

    #[test]
    fn empty_bytecode_hash_is_keccak_empty() {
        assert_eq!(Bytecode::default().hash_slow(), KECCAK_EMPTY);
    }
}
