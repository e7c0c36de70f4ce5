use super::{JumpTable, LegacyAnalyzedBytecode};
use crate::opcode;
use alloc::vec::Vec;
use alloy_primitives::Bytes;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};

/// Number of padding bytes appended to the analyzed bytecode.
///
/// 33 bytes guarantee that a `PUSH32` as the last byte of the original code
/// can still read its full immediate in-bounds, and that the buffer always
/// terminates in a zero byte (`STOP`).
pub const PADDING_LEN: usize = 33;

/// Analyzes the bytecode for use in [`LegacyAnalyzedBytecode`].
///
/// A single forward scan marks every `JUMPDEST` that is not an immediate of a
/// preceding PUSH, then the code is extended with [`PADDING_LEN`] zero bytes.
/// The jump table has one bit per padded byte.
pub fn analyze_legacy(bytecode: &Bytes) -> LegacyAnalyzedBytecode {
    let original_len = bytecode.len();
    let padded_len = original_len + PADDING_LEN;

    let mut jumps: BitVec<u8> = bitvec![u8, Lsb0; 0; padded_len];

    let mut i = 0;
    while i < original_len {
        let opcode = bytecode[i];
        if opcode == opcode::JUMPDEST {
            jumps.set(i, true);
            i += 1;
        } else {
            let push_offset = opcode.wrapping_sub(opcode::PUSH1);
            if push_offset < 32 {
                // Skip the PUSH immediates.
                i += push_offset as usize + 2;
            } else {
                i += 1;
            }
        }
    }

    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(bytecode);
    padded.resize(padded_len, 0);

    LegacyAnalyzedBytecode::new(Bytes::from(padded), original_len, JumpTable::new(jumps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_always_33_bytes() {
        for code in [
            &[][..],
            &[opcode::STOP][..],
            &[opcode::PUSH1, 0x01][..],
            &[opcode::PUSH32][..],
        ] {
            let analyzed = analyze_legacy(&Bytes::copy_from_slice(code));
            assert_eq!(analyzed.bytecode().len(), code.len() + PADDING_LEN);
            assert_eq!(analyzed.original_len(), code.len());
        }
    }

    #[test]
    fn jumpdest_at_start() {
        let analyzed = analyze_legacy(&Bytes::from_static(&[
            opcode::JUMPDEST,
            opcode::PUSH1,
            0x01,
            opcode::STOP,
        ]));
        assert!(analyzed.jump_table().is_valid(0));
        assert!(!analyzed.jump_table().is_valid(1));
    }

    #[test]
    fn jumpdest_after_push() {
        let analyzed = analyze_legacy(&Bytes::from_static(&[
            opcode::PUSH1,
            0x01,
            opcode::JUMPDEST,
            opcode::STOP,
        ]));
        assert!(analyzed.jump_table().is_valid(2));
    }

    #[test]
    fn jumpdest_in_push_data_is_not_valid() {
        let analyzed = analyze_legacy(&Bytes::from_static(&[
            opcode::PUSH2,
            opcode::JUMPDEST,
            0x02,
            opcode::STOP,
        ]));
        assert!(!analyzed.jump_table().is_valid(1));
    }

    #[test]
    fn multiple_jumpdests() {
        let analyzed = analyze_legacy(&Bytes::from_static(&[
            opcode::JUMPDEST,
            opcode::PUSH1,
            0x01,
            opcode::JUMPDEST,
            opcode::STOP,
        ]));
        assert!(analyzed.jump_table().is_valid(0));
        assert!(analyzed.jump_table().is_valid(3));
    }

    #[test]
    fn truncated_push_does_not_read_out_of_bounds() {
        // PUSH16 with only one immediate byte present.
        let analyzed = analyze_legacy(&Bytes::from_static(&[opcode::PUSH1, 0x01, opcode::PUSH16]));
        assert_eq!(analyzed.bytecode().len(), 3 + PADDING_LEN);
    }

    #[test]
    fn invalid_opcode_is_not_a_jumpdest() {
        let analyzed = analyze_legacy(&Bytes::from_static(&[0xFF, opcode::STOP]));
        assert!(!analyzed.jump_table().is_valid(0));
    }
}
