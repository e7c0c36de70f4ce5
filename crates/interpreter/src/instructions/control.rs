use crate::{gas, Host, InstructionResult, Interpreter, InterpreterAction, InterpreterResult};
use primitives::{Bytes, U256};

pub fn jump<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::MID);
    pop!(interpreter, dest);
    jump_inner(interpreter, dest);
}

pub fn jumpi<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::HIGH);
    pop!(interpreter, dest, value);
    if !value.is_zero() {
        jump_inner(interpreter, dest);
    }
}

#[inline]
fn jump_inner(interpreter: &mut Interpreter, dest: U256) {
    let dest = as_usize_or_fail!(interpreter, dest, InstructionResult::InvalidJump);
    if !interpreter.contract.is_valid_jump(dest) {
        interpreter.instruction_result = InstructionResult::InvalidJump;
        return;
    }
    interpreter.program_counter = dest;
}

pub fn jumpdest<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::JUMPDEST);
}

pub fn pc<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    // The program counter is already incremented past this opcode.
    push!(interpreter, U256::from(interpreter.program_counter - 1));
}

#[inline]
fn return_inner(interpreter: &mut Interpreter, instruction_result: InstructionResult) {
    // Zero gas cost.
    pop!(interpreter, offset, len);
    let len = as_usize_or_fail!(interpreter, len);
    let mut output = Bytes::default();
    if len != 0 {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        output = Bytes::copy_from_slice(interpreter.memory.slice(offset, len));
    }
    interpreter.instruction_result = instruction_result;
    interpreter.next_action = InterpreterAction::Return {
        result: InterpreterResult {
            output,
            gas: interpreter.gas,
            result: instruction_result,
        },
    };
}

pub fn ret<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    return_inner(interpreter, InstructionResult::Return);
}

/// EIP-140: REVERT instruction
pub fn revert<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, BYZANTIUM);
    return_inner(interpreter, InstructionResult::Revert);
}

pub fn stop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::Stop;
}

/// The designated invalid opcode `0xFE`.
pub fn invalid<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::InvalidFEOpcode;
}

/// Any opcode without an assigned operation.
pub fn unknown<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.instruction_result = InstructionResult::OpcodeNotFound;
}

#[cfg(test)]
mod tests {
    use super::super::tests::{run, run_expect_halt};
    use crate::InstructionResult;
    use bytecode::opcode;
    use primitives::Bytes;

    #[test]
    fn conditional_jump_not_taken() {
        // PUSH1 0 (condition), PUSH1 7, JUMPI, PUSH1 1, STOP, JUMPDEST
        let (interpreter, action) = run(&[
            opcode::PUSH1, 0x00,
            opcode::PUSH1, 0x07,
            opcode::JUMPI,
            opcode::PUSH1, 0x01,
        ]);
        assert_eq!(
            action.into_result_return().unwrap().result,
            InstructionResult::Stop
        );
        assert_eq!(interpreter.stack.len(), 1);
    }

    #[test]
    fn return_copies_memory() {
        // MSTORE 0x2A at 0, RETURN 32 bytes.
        let (_, action) = run(&[
            opcode::PUSH1, 0x2A,
            opcode::PUSH1, 0x00,
            opcode::MSTORE,
            opcode::PUSH1, 0x20,
            opcode::PUSH1, 0x00,
            opcode::RETURN,
        ]);
        let result = action.into_result_return().unwrap();
        assert_eq!(result.result, InstructionResult::Return);
        let mut expected = [0u8; 32];
        expected[31] = 0x2A;
        assert_eq!(result.output, Bytes::copy_from_slice(&expected));
    }

    #[test]
    fn revert_carries_output() {
        let (_, action) = run(&[
            opcode::PUSH1, 0x01,
            opcode::PUSH1, 0x00,
            opcode::MSTORE8,
            opcode::PUSH1, 0x01,
            opcode::PUSH1, 0x00,
            opcode::REVERT,
        ]);
        let result = action.into_result_return().unwrap();
        assert_eq!(result.result, InstructionResult::Revert);
        assert_eq!(result.output, Bytes::from_static(&[0x01]));
    }

    #[test]
    fn jump_to_push_immediate_fails() {
        // The JUMPDEST byte at offset 1 is PUSH data.
        run_expect_halt(
            &[opcode::PUSH1, opcode::JUMPDEST as u8, opcode::PUSH1, 0x01, opcode::JUMP],
            InstructionResult::InvalidJump,
        );
    }
}
