use crate::{gas, Host, InstructionResult, Interpreter};
use core::cmp::min;
use primitives::{U256, KECCAK_EMPTY};

pub fn keccak256<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    pop_top!(interpreter, offset, len_ptr);
    let len = as_usize_or_fail!(interpreter, len_ptr);
    gas_or_fail!(interpreter, gas::keccak256_cost(len as u64));
    let hash = if len == 0 {
        KECCAK_EMPTY
    } else {
        let from = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, from, len);
        primitives::keccak256(interpreter.memory.slice(from, len))
    };
    *len_ptr = hash.into();
}

pub fn address<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push_b256!(interpreter, interpreter.contract.address.into_word());
}

pub fn caller<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push_b256!(interpreter, interpreter.contract.caller.into_word());
}

pub fn callvalue<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, interpreter.contract.value);
}

pub fn calldataload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop_top!(interpreter, index_ptr);
    let index = as_usize_saturated!(index_ptr);
    let input = &interpreter.contract.input;
    let mut word = [0u8; 32];
    if index < input.len() {
        let have = min(32, input.len() - index);
        word[..have].copy_from_slice(&input[index..index + have]);
    }
    *index_ptr = U256::from_be_bytes(word);
}

pub fn calldatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.contract.input.len()));
}

pub fn calldatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    pop!(interpreter, memory_offset, data_offset, len);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let data_offset = as_usize_saturated!(data_offset);
    resize_memory!(interpreter, memory_offset, len);

    // Bounds of the input are handled by `set_data`, which zero-fills.
    let input = interpreter.contract.input.clone();
    interpreter
        .memory
        .set_data(memory_offset, data_offset, len, &input);
}

pub fn codesize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        U256::from(interpreter.contract.bytecode.len())
    );
}

pub fn codecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    pop!(interpreter, memory_offset, code_offset, len);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    let code = interpreter.contract.bytecode.clone();
    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, code.original_byte_slice());
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub fn returndatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        U256::from(interpreter.return_data_buffer.len())
    );
}

/// EIP-211: New opcodes: RETURNDATASIZE and RETURNDATACOPY
pub fn returndatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    pop!(interpreter, memory_offset, offset, len);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));

    let data_offset = as_usize_saturated!(offset);
    let data_end = data_offset.saturating_add(len);
    // Reading past the return data buffer is a hard failure.
    if data_end > interpreter.return_data_buffer.len() {
        interpreter.instruction_result = InstructionResult::OutOfOffset;
        return;
    }

    if len != 0 {
        let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
        resize_memory!(interpreter, memory_offset, len);
        let data = interpreter.return_data_buffer.clone();
        interpreter
            .memory
            .set(memory_offset, &data[data_offset..data_end]);
    }
}

pub fn gas<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.gas.remaining()));
}

#[cfg(test)]
mod tests {
    use super::super::tests::run_expect_stack;
    use bytecode::opcode;
    use primitives::{keccak256, U256};

    #[test]
    fn keccak_of_memory_word() {
        let mut word = [0u8; 32];
        word[31] = 0x2A;
        let expected = U256::from_be_bytes(keccak256(word).0);
        run_expect_stack(
            &[
                opcode::PUSH1, 0x2A,
                opcode::PUSH1, 0x00,
                opcode::MSTORE,
                opcode::PUSH1, 0x20,
                opcode::PUSH1, 0x00,
                opcode::KECCAK256,
            ],
            expected,
        );
    }

    #[test]
    fn codesize_is_original_length() {
        run_expect_stack(&[opcode::CODESIZE], U256::from(1));
    }

    #[test]
    fn calldataload_out_of_range_is_zero() {
        run_expect_stack(&[opcode::PUSH1, 0x80, opcode::CALLDATALOAD], U256::ZERO);
    }

    #[test]
    fn returndatasize_starts_empty() {
        run_expect_stack(&[opcode::RETURNDATASIZE], U256::ZERO);
    }
}
