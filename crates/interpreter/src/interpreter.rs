mod contract;
mod memory;
mod stack;

pub use contract::Contract;
pub use memory::Memory;
pub use stack::{Stack, STACK_LIMIT};

use crate::{
    opcode::InstructionTable, push, push_b256, return_ok, return_revert, Gas, Host,
    InstructionResult, InterpreterAction,
};
use core::cmp::min;
use primitives::{Address, Bytes, SpecId, U256};

/// EVM bytecode interpreter: the execution engine of a single frame.
#[derive(Debug)]
pub struct Interpreter {
    /// The current program counter, an index into the padded bytecode.
    pub program_counter: usize,
    /// The gas state.
    pub gas: Gas,
    /// Contract information and invoking data.
    pub contract: Contract,
    /// The execution control flag. If this is not set to `Continue`, the
    /// interpreter will stop execution.
    pub instruction_result: InstructionResult,
    /// Frame memory.
    pub memory: Memory,
    /// Frame stack.
    pub stack: Stack,
    /// The return data buffer for internal calls.
    ///
    /// It has multiple uses: it contains the output bytes of the last sub
    /// call, and when this interpreter finishes, the output of the frame.
    pub return_data_buffer: Bytes,
    /// Whether the interpreter is in "staticcall" mode, meaning no state
    /// changes can happen.
    pub is_static: bool,
    /// The active hardfork.
    pub spec_id: SpecId,
    /// Action that the driver should do.
    ///
    /// Set inside CALL and CREATE instructions and RETURN or REVERT
    /// instructions. Additionally those instructions set the instruction
    /// result to `CallOrCreate`/`Return`/`Revert` so we know the reason.
    pub next_action: InterpreterAction,
}

/// The result of an interpreter run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpreterResult {
    /// The result of the frame execution.
    pub result: InstructionResult,
    /// The output of the frame execution.
    pub output: Bytes,
    /// The gas usage information.
    pub gas: Gas,
}

impl InterpreterResult {
    /// Returns a new `InterpreterResult` with the given values.
    pub fn new(result: InstructionResult, output: Bytes, gas: Gas) -> Self {
        Self {
            result,
            output,
            gas,
        }
    }

    /// Returns whether the instruction result is a success.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns whether the instruction result is a revert.
    #[inline]
    pub const fn is_revert(&self) -> bool {
        self.result.is_revert()
    }

    /// Returns whether the instruction result is an error.
    #[inline]
    pub const fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

impl Interpreter {
    /// Creates a new interpreter for the given contract.
    ///
    /// The frame owns its analyzed bytecode through the contract; stack and
    /// memory start empty.
    pub fn new(
        contract: Contract,
        gas_limit: u64,
        is_static: bool,
        spec_id: SpecId,
        memory_limit: u64,
    ) -> Self {
        debug_assert!(
            contract.bytecode.is_analyzed(),
            "interpreter requires analyzed bytecode"
        );
        Self {
            program_counter: 0,
            gas: Gas::new(gas_limit),
            contract,
            instruction_result: InstructionResult::Continue,
            memory: Memory::new_with_memory_limit(memory_limit),
            stack: Stack::new(),
            return_data_buffer: Bytes::new(),
            is_static,
            spec_id,
            next_action: InterpreterAction::None,
        }
    }

    /// Returns the opcode at the current program counter.
    #[inline]
    pub fn current_opcode(&self) -> u8 {
        self.contract.bytecode.bytes()[self.program_counter]
    }

    /// Returns a reference to the interpreter's gas state.
    #[inline]
    pub fn gas(&self) -> &Gas {
        &self.gas
    }

    /// Returns `true` if the given spec is enabled for this frame.
    #[inline]
    pub fn spec_enabled(&self, spec_id: SpecId) -> bool {
        self.spec_id.is_enabled_in(spec_id)
    }

    /// Executes the instruction at the current program counter.
    ///
    /// Internally it will advance the program counter by one; PUSH handlers
    /// also consume their immediate bytes.
    #[inline]
    pub fn step<H: Host + ?Sized>(&mut self, instruction_table: &InstructionTable<H>, host: &mut H) {
        // The bytecode is padded so that the buffer always ends in STOP;
        // incrementing past the last real instruction lands on padding.
        let opcode = self.current_opcode();
        self.program_counter += 1;

        let operation = &instruction_table[opcode as usize];

        // The table carries the maximum stack height at which the handler
        // cannot overflow; checking it here removes overflow checks from the
        // push paths of the handlers.
        if self.stack.len() > operation.max_stack as usize {
            self.instruction_result = InstructionResult::StackOverflow;
            return;
        }

        (operation.execute)(self, host)
    }

    /// Executes the interpreter until it returns or stops, yielding the next
    /// driver action.
    pub fn run<H: Host + ?Sized>(
        &mut self,
        instruction_table: &InstructionTable<H>,
        host: &mut H,
    ) -> InterpreterAction {
        self.next_action = InterpreterAction::None;

        while self.instruction_result == InstructionResult::Continue {
            self.step(instruction_table, host);
        }

        if self.next_action.is_some() {
            return core::mem::take(&mut self.next_action);
        }

        if self.instruction_result == InstructionResult::CallOrCreate {
            // The status flags a frame transfer but no action accompanies it;
            // the driver finalizes the frame cleanly.
            return InterpreterAction::None;
        }

        // Halted without an explicit action: return an empty output.
        InterpreterAction::Return {
            result: InterpreterResult {
                result: self.instruction_result,
                output: Bytes::new(),
                gas: self.gas,
            },
        }
    }

    /// Inserts the outcome of a sub-call into this (parent) interpreter and
    /// resumes it.
    ///
    /// Unused gas of the child is returned, its refund counter is merged on
    /// success, the output prefix is copied into the reserved return window
    /// and the success flag is pushed.
    pub fn insert_call_outcome(
        &mut self,
        result: InterpreterResult,
        return_memory_offset: (usize, usize),
    ) {
        self.instruction_result = InstructionResult::Continue;
        self.return_data_buffer = result.output;

        let (out_offset, out_len) = return_memory_offset;
        let target_len = min(out_len, self.return_data_buffer.len());

        match result.result {
            return_ok!() => {
                self.gas.erase_cost(result.gas.remaining());
                self.gas.record_refund(result.gas.refunded());
                let output = self.return_data_buffer.clone();
                self.memory.set(out_offset, &output[..target_len]);
                push!(self, U256::from(1));
            }
            return_revert!() => {
                self.gas.erase_cost(result.gas.remaining());
                let output = self.return_data_buffer.clone();
                self.memory.set(out_offset, &output[..target_len]);
                push!(self, U256::ZERO);
            }
            InstructionResult::FatalExternalError => {
                self.instruction_result = InstructionResult::FatalExternalError;
            }
            _ => {
                push!(self, U256::ZERO);
            }
        }
    }

    /// Inserts the outcome of a sub-create into this (parent) interpreter and
    /// resumes it.
    ///
    /// On success the created address is pushed as a left-padded word; on
    /// revert the revert data is kept in the return data buffer.
    pub fn insert_create_outcome(&mut self, result: InterpreterResult, address: Option<Address>) {
        self.instruction_result = InstructionResult::Continue;

        self.return_data_buffer = if result.result.is_revert() {
            // Save data to the return data buffer if the create reverted.
            result.output
        } else {
            // Otherwise clear it.
            Bytes::new()
        };

        match result.result {
            return_ok!() => {
                self.gas.erase_cost(result.gas.remaining());
                self.gas.record_refund(result.gas.refunded());
                push_b256!(self, address.unwrap_or_default().into_word());
            }
            return_revert!() => {
                self.gas.erase_cost(result.gas.remaining());
                push!(self, U256::ZERO);
            }
            InstructionResult::FatalExternalError => {
                self.instruction_result = InstructionResult::FatalExternalError;
            }
            _ => {
                push!(self, U256::ZERO);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{host::PlainHost, opcode::make_instruction_table};
    use primitives::Bytecode;

    fn interpreter(code: &'static [u8]) -> Interpreter {
        Interpreter::new(
            Contract::new(
                Bytes::new(),
                Bytecode::new_raw(Bytes::from_static(code)),
                primitives::KECCAK_EMPTY,
                Address::ZERO,
                Address::ZERO,
                U256::ZERO,
            ),
            u64::MAX,
            false,
            SpecId::CANCUN,
            u64::MAX,
        )
    }

    #[test]
    fn simple_arithmetic_gas_and_stack() {
        // PUSH1 1, PUSH1 2, ADD
        let mut interp = interpreter(&[0x60, 0x01, 0x60, 0x02, 0x01]);
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();

        let action = interp.run(&table, &mut host);
        let InterpreterAction::Return { result } = action else {
            panic!("expected return action");
        };
        assert_eq!(result.result, InstructionResult::Stop);
        assert_eq!(interp.stack.peek(0), Ok(U256::from(3)));
        assert_eq!(result.gas.spent(), 9);
    }

    #[test]
    fn invalid_jump_halts() {
        // PUSH1 3, JUMP, REVERT, JUMPDEST, PUSH1 1 -- target 3 is not a JUMPDEST
        let mut interp = interpreter(&[0x60, 0x03, 0x56, 0xFD, 0x5B, 0x60, 0x01]);
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();

        let action = interp.run(&table, &mut host);
        assert_eq!(
            action.into_result_return().unwrap().result,
            InstructionResult::InvalidJump
        );
    }

    #[test]
    fn valid_jump_continues() {
        // PUSH1 4, JUMP, REVERT, JUMPDEST, PUSH1 1
        let mut interp = interpreter(&[0x60, 0x04, 0x56, 0xFD, 0x5B, 0x60, 0x01]);
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();

        let action = interp.run(&table, &mut host);
        let result = action.into_result_return().unwrap();
        assert_eq!(result.result, InstructionResult::Stop);
        // 3 (PUSH) + 8 (JUMP) + 1 (JUMPDEST) + 3 (PUSH)
        assert_eq!(result.gas.spent(), 15);
        assert_eq!(interp.stack.peek(0), Ok(U256::from(1)));
    }

    #[test]
    fn stack_overflow_is_checked_before_dispatch() {
        // An unconditional loop of PUSH1 would overflow; the table pre-check
        // must trip before handler invocation.
        let mut interp = interpreter(&[0x5B, 0x60, 0x01, 0x60, 0x00, 0x56]);
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();

        let action = interp.run(&table, &mut host);
        assert_eq!(
            action.into_result_return().unwrap().result,
            InstructionResult::StackOverflow
        );
        assert!(interp.stack.len() <= STACK_LIMIT);
    }

    #[test]
    fn invalid_opcode_and_unknown_opcode() {
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();

        let mut interp = interpreter(&[0xFE]);
        assert_eq!(
            interp.run(&table, &mut host).into_result_return().unwrap().result,
            InstructionResult::InvalidFEOpcode
        );

        let mut interp = interpreter(&[0x0C]);
        assert_eq!(
            interp.run(&table, &mut host).into_result_return().unwrap().result,
            InstructionResult::OpcodeNotFound
        );
    }

    #[test]
    fn fork_disabled_opcode_is_not_found() {
        // PUSH0 before Shanghai.
        let mut interp = interpreter(&[0x5F]);
        interp.spec_id = SpecId::MERGE;
        let mut host = PlainHost::default();
        let table = make_instruction_table::<PlainHost>();
        assert_eq!(
            interp.run(&table, &mut host).into_result_return().unwrap().result,
            InstructionResult::OpcodeNotFound
        );
    }
}
