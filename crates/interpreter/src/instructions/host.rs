use crate::{gas, Host, InstructionResult, Interpreter};
use alloc::vec::Vec;
use primitives::{Bytes, Log, SpecId, B256, BLOCK_HASH_HISTORY, U256};

pub fn balance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    pop_address!(interpreter, address);
    let Some((balance, is_cold)) = host.balance(address) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    gas!(
        interpreter,
        gas::account_access_gas(interpreter.spec_id, is_cold)
    );
    push!(interpreter, balance);
}

/// EIP-1884: Repricing for trie-size-dependent opcodes
pub fn selfbalance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, ISTANBUL);
    gas!(interpreter, gas::LOW);
    let Some((balance, _)) = host.balance(interpreter.contract.address) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    push!(interpreter, balance);
}

pub fn extcodesize<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    pop_address!(interpreter, address);
    let Some((code, is_cold)) = host.code(address) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let cost = if interpreter.spec_enabled(SpecId::BERLIN) {
        gas::warm_cold_cost(is_cold)
    } else if interpreter.spec_enabled(SpecId::TANGERINE) {
        700
    } else {
        20
    };
    gas!(interpreter, cost);
    push!(interpreter, U256::from(code.len()));
}

/// EIP-1052: EXTCODEHASH opcode
pub fn extcodehash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CONSTANTINOPLE);
    pop_address!(interpreter, address);
    let Some((code_hash, is_cold)) = host.code_hash(address) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let cost = if interpreter.spec_enabled(SpecId::BERLIN) {
        gas::warm_cold_cost(is_cold)
    } else if interpreter.spec_enabled(SpecId::ISTANBUL) {
        700
    } else {
        400
    };
    gas!(interpreter, cost);
    push_b256!(interpreter, code_hash);
}

pub fn extcodecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    pop_address!(interpreter, address);
    pop!(interpreter, memory_offset, code_offset, len_u256);

    let Some((code, is_cold)) = host.code(address) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };

    let len = as_usize_or_fail!(interpreter, len_u256);
    gas_or_fail!(
        interpreter,
        gas::extcodecopy_cost(interpreter.spec_id, len as u64, is_cold)
    );
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = as_usize_saturated!(code_offset);
    resize_memory!(interpreter, memory_offset, len);

    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, code.original_byte_slice());
}

pub fn blockhash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BLOCKHASH);
    pop_top!(interpreter, number_ptr);

    let block_number = host.env().block.number;
    if let Some(diff) = block_number.checked_sub(*number_ptr) {
        let diff = as_usize_saturated!(diff);
        // Hashes are available only for the last 256 blocks, and the hash of
        // the current block is not.
        if diff > 0 && diff <= BLOCK_HASH_HISTORY as usize {
            let requested = as_u64_saturated!(*number_ptr);
            let Some(hash) = host.block_hash(requested) else {
                interpreter.instruction_result = InstructionResult::FatalExternalError;
                return;
            };
            *number_ptr = U256::from_be_bytes(hash.0);
            return;
        }
    }
    *number_ptr = U256::ZERO;
}

pub fn sload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    pop_top!(interpreter, index_ptr);

    let Some((value, is_cold)) = host.sload(interpreter.contract.address, *index_ptr) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    gas!(interpreter, gas::sload_cost(interpreter.spec_id, is_cold));
    *index_ptr = value;
}

pub fn sstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_staticcall!(interpreter);

    pop!(interpreter, index, value);
    let Some(result) = host.sstore(interpreter.contract.address, index, value) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };
    let cost = gas::sstore_cost(
        interpreter.spec_id,
        result.original_value,
        result.present_value,
        result.new_value,
        interpreter.gas.remaining(),
        result.is_cold,
    );
    let Some(cost) = cost else {
        // EIP-1706: SSTORE with gas left at or below the stipend.
        interpreter.instruction_result = InstructionResult::ReentrancySentryOOG;
        return;
    };
    gas!(interpreter, cost);
    refund!(
        interpreter,
        gas::sstore_refund(
            interpreter.spec_id,
            result.original_value,
            result.present_value,
            result.new_value
        )
    );
}

/// EIP-1153: Transient storage opcodes
///
/// Stores a value in transient storage.
pub fn tstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CANCUN);
    check_staticcall!(interpreter);
    gas!(interpreter, gas::WARM_STORAGE_READ_COST);

    pop!(interpreter, index, value);
    host.tstore(interpreter.contract.address, index, value);
}

/// EIP-1153: Transient storage opcodes
///
/// Loads a value from transient storage.
pub fn tload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CANCUN);
    gas!(interpreter, gas::WARM_STORAGE_READ_COST);

    pop_top!(interpreter, index_ptr);
    *index_ptr = host.tload(interpreter.contract.address, *index_ptr);
}

pub fn log<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_staticcall!(interpreter);

    pop!(interpreter, offset, len);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::log_cost(N as u8, len as u64));
    let data = if len == 0 {
        Bytes::new()
    } else {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        Bytes::copy_from_slice(interpreter.memory.slice(offset, len))
    };

    if interpreter.stack.len() < N {
        interpreter.instruction_result = InstructionResult::StackUnderflow;
        return;
    }

    let mut topics = Vec::with_capacity(N);
    for _ in 0..N {
        // Stack bounds are checked above.
        topics.push(B256::from(interpreter.stack.pop().unwrap()));
    }

    host.log(Log {
        address: interpreter.contract.address,
        topics,
        data,
    });
}

pub fn selfdestruct<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_staticcall!(interpreter);
    pop_address!(interpreter, target);

    let Some(result) = host.selfdestruct(interpreter.contract.address, target) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return;
    };

    // EIP-3529: Reduction in refunds
    if !interpreter.spec_enabled(SpecId::LONDON) && !result.previously_destroyed {
        refund!(interpreter, gas::SELFDESTRUCT);
    }
    gas!(
        interpreter,
        gas::selfdestruct_cost(interpreter.spec_id, &result)
    );

    interpreter.instruction_result = InstructionResult::SelfDestruct;
}

#[cfg(test)]
mod tests {
    use super::super::tests::{run, run_expect_halt, run_with_host};
    use crate::{host::PlainHost, InstructionResult};
    use bytecode::opcode;
    use primitives::U256;

    #[test]
    fn sstore_then_sload_roundtrip() {
        let mut host = PlainHost::default();
        let (interpreter, action) = run_with_host(
            &[
                opcode::PUSH1, 0x2A,
                opcode::PUSH1, 0x01,
                opcode::SSTORE,
                opcode::PUSH1, 0x01,
                opcode::SLOAD,
            ],
            &mut host,
        );
        assert!(action.into_result_return().unwrap().result.is_ok());
        assert_eq!(interpreter.stack.peek(0), Ok(U256::from(0x2A)));
    }

    #[test]
    fn tstore_tload_roundtrip() {
        let mut host = PlainHost::default();
        let (interpreter, action) = run_with_host(
            &[
                opcode::PUSH1, 0x07,
                opcode::PUSH1, 0x01,
                opcode::TSTORE,
                opcode::PUSH1, 0x01,
                opcode::TLOAD,
            ],
            &mut host,
        );
        assert!(action.into_result_return().unwrap().result.is_ok());
        assert_eq!(interpreter.stack.peek(0), Ok(U256::from(0x07)));
    }

    #[test]
    fn log_records_topics_and_data() {
        let mut host = PlainHost::default();
        let (_, action) = run_with_host(
            &[
                opcode::PUSH1, 0x2A,
                opcode::PUSH1, 0x00,
                opcode::MSTORE8,
                opcode::PUSH1, 0xAA, // topic
                opcode::PUSH1, 0x01, // len
                opcode::PUSH1, 0x00, // offset
                opcode::LOG1,
            ],
            &mut host,
        );
        assert!(action.into_result_return().unwrap().result.is_ok());
        assert_eq!(host.log.len(), 1);
        assert_eq!(host.log[0].topics.len(), 1);
        assert_eq!(host.log[0].data.as_ref(), &[0x2A]);
    }

    #[test]
    fn blockhash_outside_window_is_zero() {
        let (interpreter, action) = run(&[opcode::PUSH1, 0x01, opcode::BLOCKHASH]);
        assert!(action.into_result_return().unwrap().result.is_ok());
        assert_eq!(interpreter.stack.peek(0), Ok(U256::ZERO));
    }

    #[test]
    fn static_sstore_is_rejected() {
        // Static flag is set manually through the test harness in the
        // interpreter tests; here a LOG in a static context is covered by the
        // driver tests. Exercise the non-static failure path instead.
        run_expect_halt(&[opcode::SSTORE], InstructionResult::StackUnderflow);
    }
}
