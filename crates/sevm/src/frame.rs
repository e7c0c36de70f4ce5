use crate::JournalCheckpoint;
use interpreter::{Interpreter, InterpreterResult};
use primitives::Address;

/// A single execution context on the call stack.
///
/// Every frame owns exactly one journal checkpoint; the checkpoint is
/// committed or reverted before the frame is dropped.
#[derive(Debug)]
pub struct CallFrame {
    /// The interpreter of the frame, owning its bytecode, stack and memory.
    pub interpreter: Interpreter,
    /// The journal checkpoint opened for this frame.
    pub checkpoint: JournalCheckpoint,
    /// The caller-reserved return window `(offset, len)`; unused for create
    /// frames.
    pub return_memory_offset: (usize, usize),
    /// Whether the frame executes init code.
    pub is_create: bool,
    /// The address being created, for create frames.
    pub created_address: Option<Address>,
}

/// Result of the topmost frame, handed to post-execution.
#[derive(Debug)]
pub struct FrameResult {
    /// The interpreter result of the frame.
    pub result: InterpreterResult,
    /// The created address if the frame was a create.
    pub created_address: Option<Address>,
}
