//! Per-opcode instruction implementations.

#[macro_use]
mod macros;

pub mod arithmetic;
pub mod bitwise;
pub mod contract;
pub mod control;
pub mod host;
pub mod host_env;
pub mod i256;
pub mod memory;
pub mod stack;
pub mod system;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        host::PlainHost, opcode::make_instruction_table, Contract, InstructionResult, Interpreter,
        InterpreterAction,
    };
    use primitives::{Address, Bytecode, Bytes, SpecId, U256, KECCAK_EMPTY};

    /// Runs the given bytecode against a plain host on the latest spec.
    pub(crate) fn run(code: &[u8]) -> (Interpreter, InterpreterAction) {
        run_with_host(code, &mut PlainHost::default())
    }

    pub(crate) fn run_with_host(code: &[u8], host: &mut PlainHost) -> (Interpreter, InterpreterAction) {
        let mut interpreter = Interpreter::new(
            Contract::new(
                Bytes::new(),
                Bytecode::new_raw(Bytes::copy_from_slice(code)),
                KECCAK_EMPTY,
                Address::ZERO,
                Address::ZERO,
                U256::ZERO,
            ),
            1_000_000,
            false,
            SpecId::CANCUN,
            u64::MAX,
        );
        let table = make_instruction_table::<PlainHost>();
        let action = interpreter.run(&table, host);
        (interpreter, action)
    }

    /// Runs the bytecode and asserts that it stops with the given value on
    /// top of the stack.
    pub(crate) fn run_expect_stack(code: &[u8], expected_top: U256) {
        let (interpreter, action) = run(code);
        let result = action.into_result_return().expect("expected return action");
        assert!(result.result.is_ok(), "unexpected result {:?}", result.result);
        assert_eq!(interpreter.stack.peek(0), Ok(expected_top));
    }

    /// Runs the bytecode and asserts that it halts with the given result.
    pub(crate) fn run_expect_halt(code: &[u8], expected: InstructionResult) {
        let (_, action) = run(code);
        let result = action.into_result_return().expect("expected return action");
        assert_eq!(result.result, expected);
    }
}
