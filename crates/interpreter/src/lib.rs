//! # sevm-interpreter
//!
//! Per-frame EVM execution: stack, memory, gas metering, the instruction set
//! and the dispatch loop. The interpreter speaks to the world exclusively
//! through the [`Host`] trait and yields [`InterpreterAction`]s for the
//! driver to apply.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod gas;
mod host;
mod inner_models;
mod instruction_result;
pub mod instructions;
mod interpreter;
mod interpreter_action;
pub mod opcode;

pub use gas::Gas;
pub use host::{Host, PlainHost};
pub use inner_models::{
    CallContext, CallInputs, CallScheme, CreateInputs, CreateScheme, SStoreResult,
    SelfDestructResult, Transfer,
};
pub use instruction_result::{InstructionResult, SuccessOrHalt};
pub use interpreter::{Contract, Interpreter, InterpreterResult, Memory, Stack, STACK_LIMIT};
pub use interpreter_action::InterpreterAction;
pub use opcode::{
    make_instruction_table, Instruction, InstructionTable, OpCode, Operation, OPCODE_JUMPMAP,
};

/// EVM call stack limit.
pub const CALL_STACK_LIMIT: u64 = 1024;
