use crate::{gas, Host, Interpreter};
use core::cmp::max;
use primitives::U256;

pub fn mload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop_top!(interpreter, top);
    let index = as_usize_or_fail!(interpreter, top);
    resize_memory!(interpreter, index, 32);
    *top = interpreter.memory.get_u256(index);
}

pub fn mstore<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop!(interpreter, offset, value);
    let index = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, index, 32);
    interpreter.memory.set_u256(index, value);
}

pub fn mstore8<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop!(interpreter, offset, value);
    let index = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, index, 1);
    interpreter.memory.set_byte(index, value.byte(0));
}

pub fn msize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.memory.len()));
}

/// EIP-5656: MCOPY - Memory copying instruction
pub fn mcopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, CANCUN);
    pop!(interpreter, dst, src, len);

    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }

    let dst = as_usize_or_fail!(interpreter, dst);
    let src = as_usize_or_fail!(interpreter, src);
    // Resize to the max offset touched by the copy.
    resize_memory!(interpreter, max(dst, src), len);
    interpreter.memory.copy(dst, src, len);
}

#[cfg(test)]
mod tests {
    use super::super::tests::run_expect_stack;
    use bytecode::opcode;
    use primitives::U256;

    #[test]
    fn mstore_mload_roundtrip() {
        run_expect_stack(
            &[
                opcode::PUSH1, 0x2A,
                opcode::PUSH1, 0x20,
                opcode::MSTORE,
                opcode::PUSH1, 0x20,
                opcode::MLOAD,
            ],
            U256::from(0x2A),
        );
    }

    #[test]
    fn msize_reports_word_aligned_len() {
        run_expect_stack(
            &[
                opcode::PUSH1, 0x01,
                opcode::PUSH1, 0x21,
                opcode::MSTORE8,
                opcode::MSIZE,
            ],
            U256::from(64),
        );
    }

    #[test]
    fn mcopy_moves_bytes() {
        run_expect_stack(
            &[
                opcode::PUSH1, 0x2A,
                opcode::PUSH1, 0x00,
                opcode::MSTORE,
                // copy word at 0 to 32.
                opcode::PUSH1, 0x20, // len
                opcode::PUSH1, 0x00, // src
                opcode::PUSH1, 0x20, // dst
                opcode::MCOPY,
                opcode::PUSH1, 0x20,
                opcode::MLOAD,
            ],
            U256::from(0x2A),
        );
    }
}
