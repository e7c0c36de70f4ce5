use super::{analysis::PADDING_LEN, JumpTable};
use alloc::vec;
use alloy_primitives::Bytes;

/// Analyzed legacy bytecode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacyAnalyzedBytecode {
    /// Bytecode with 33 zero bytes of padding.
    bytecode: Bytes,
    /// Original byte length.
    original_len: usize,
    /// Jump table, one bit per padded byte.
    jump_table: JumpTable,
}

impl Default for LegacyAnalyzedBytecode {
    #[inline]
    fn default() -> Self {
        super::analyze_legacy(&Bytes::new())
    }
}

impl LegacyAnalyzedBytecode {
    /// Creates new analyzed bytecode.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is not padded with exactly 33 bytes or the jump
    /// table does not cover the padded buffer.
    pub fn new(bytecode: Bytes, original_len: usize, jump_table: JumpTable) -> Self {
        assert_eq!(
            bytecode.len(),
            original_len + PADDING_LEN,
            "analyzed bytecode is not padded",
        );
        assert_eq!(
            jump_table.len(),
            bytecode.len(),
            "jump table length does not match padded bytecode",
        );
        Self {
            bytecode,
            original_len,
            jump_table,
        }
    }

    /// Returns the padded byte buffer.
    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Original bytes length.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Original bytes without padding.
    pub fn original_byte_slice(&self) -> &[u8] {
        &self.bytecode[..self.original_len]
    }

    /// Original bytes without padding, sharing the underlying buffer.
    pub fn original_bytes(&self) -> Bytes {
        self.bytecode.slice(..self.original_len)
    }

    /// Jump table of the analyzed code.
    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }

    /// Returns `true` iff `pc` is a valid jump destination: inside the
    /// original code and marked in the jump table.
    #[inline]
    pub fn is_valid_jump(&self, pc: usize) -> bool {
        pc < self.original_len && self.jump_table.is_valid(pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    #[should_panic(expected = "analyzed bytecode is not padded")]
    fn unpadded_bytecode_panics() {
        let _ = LegacyAnalyzedBytecode::new(Bytes::from(vec![0u8; 4]), 4, JumpTable::default());
    }

    #[test]
    fn jump_in_padding_is_invalid() {
        // JUMPDEST as the only byte: valid at 0, padding never is.
        let analyzed = super::super::analyze_legacy(&Bytes::from_static(&[opcode::JUMPDEST]));
        assert!(analyzed.is_valid_jump(0));
        assert!(!analyzed.is_valid_jump(1));
        assert!(!analyzed.is_valid_jump(33));
    }
}
