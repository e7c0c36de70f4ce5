use crate::{gas, Host, Interpreter};
use primitives::U256;

pub fn pop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    if let Err(result) = interpreter.stack.pop() {
        interpreter.instruction_result = result;
    }
}

/// EIP-3855: PUSH0 instruction
///
/// Introduce a new instruction which pushes the constant value 0 onto the
/// stack.
pub fn push0<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, SHANGHAI);
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::ZERO);
}

pub fn push<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    // The program counter is incremented past the opcode; the padding
    // guarantees that the immediate bytes are in bounds.
    let start = interpreter.program_counter;
    if let Err(result) = interpreter
        .stack
        .push_slice(&interpreter.contract.bytecode.bytes()[start..start + N])
    {
        interpreter.instruction_result = result;
        return;
    }
    interpreter.program_counter += N;
}

pub fn dup<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    if let Err(result) = interpreter.stack.dup(N) {
        interpreter.instruction_result = result;
    }
}

pub fn swap<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    if let Err(result) = interpreter.stack.swap(N) {
        interpreter.instruction_result = result;
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{run, run_expect_stack};
    use bytecode::opcode;
    use primitives::U256;

    #[test]
    fn push_reads_immediates() {
        run_expect_stack(&[opcode::PUSH2, 0x01, 0x02], U256::from(0x0102));
        run_expect_stack(&[opcode::PUSH0], U256::ZERO);
    }

    #[test]
    fn push_at_end_of_code_is_zero_padded() {
        // PUSH2 with a single immediate byte: the missing byte reads from the
        // zero padding.
        run_expect_stack(&[opcode::PUSH1, 0x01, opcode::PUSH2, 0xFF], U256::from(0xFF00));
    }

    #[test]
    fn dup_and_swap() {
        run_expect_stack(
            &[opcode::PUSH1, 0x01, opcode::PUSH1, 0x02, opcode::DUP2],
            U256::from(1),
        );
        run_expect_stack(
            &[opcode::PUSH1, 0x01, opcode::PUSH1, 0x02, opcode::SWAP1],
            U256::from(1),
        );
    }

    #[test]
    fn pop_removes_top() {
        let (interpreter, action) = run(&[opcode::PUSH1, 0x01, opcode::POP]);
        assert!(action.into_result_return().unwrap().result.is_ok());
        assert!(interpreter.stack.is_empty());
    }
}
