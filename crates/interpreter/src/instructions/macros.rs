//! Utility macros to help implementing opcode instruction functions.

/// Fails the instruction with a state-change violation if the current call
/// is static.
#[macro_export]
macro_rules! check_staticcall {
    ($interp:expr) => {
        if $interp.is_static {
            $interp.instruction_result = $crate::InstructionResult::StateChangeDuringStaticCall;
            return;
        }
    };
}

/// Checks that the `$min` spec is enabled; a fork-disabled opcode terminates
/// the frame with an opcode-not-found status.
#[macro_export]
macro_rules! check {
    ($interp:expr, $min:ident) => {
        if !$interp.spec_enabled(primitives::SpecId::$min) {
            $interp.instruction_result = $crate::InstructionResult::OpcodeNotFound;
            return;
        }
    };
}

/// Records a `gas` cost and fails the instruction if it would exceed the
/// available gas.
#[macro_export]
macro_rules! gas {
    ($interp:expr, $gas:expr) => {
        $crate::gas!($interp, $gas, ())
    };
    ($interp:expr, $gas:expr, $ret:expr) => {
        if !$interp.gas.record_cost($gas) {
            $interp.instruction_result = $crate::InstructionResult::OutOfGas;
            return $ret;
        }
    };
}

/// Records a gas cost computed with checked arithmetic; `None` means the
/// operand was too large to price.
#[macro_export]
macro_rules! gas_or_fail {
    ($interp:expr, $gas:expr) => {
        match $gas {
            Some(gas_used) => $crate::gas!($interp, gas_used),
            None => {
                $interp.instruction_result = $crate::InstructionResult::InvalidOperandOOG;
                return;
            }
        }
    };
}

/// Records a gas refund.
#[macro_export]
macro_rules! refund {
    ($interp:expr, $gas:expr) => {
        $interp.gas.record_refund($gas)
    };
}

/// Resizes the current context memory to hold `$offset + $len` bytes,
/// charging the incremental expansion cost.
#[macro_export]
macro_rules! resize_memory {
    ($interp:expr, $offset:expr, $len:expr) => {
        $crate::resize_memory!($interp, $offset, $len, ())
    };
    ($interp:expr, $offset:expr, $len:expr, $ret:expr) => {
        let size = $offset.saturating_add($len);
        if size > $interp.memory.len() {
            if $interp.memory.limit_reached(size) {
                $interp.instruction_result = $crate::InstructionResult::MemoryLimitOOG;
                return $ret;
            }
            // Memory is always extended in 32-byte words.
            let rounded_size = $crate::gas::num_words(size as u64) as usize * 32;
            match $interp.gas.record_memory_expansion(rounded_size / 32) {
                $crate::gas::MemoryExtensionResult::Extended => {
                    $interp.memory.resize(rounded_size);
                }
                $crate::gas::MemoryExtensionResult::OutOfGas => {
                    $interp.instruction_result = $crate::InstructionResult::MemoryOOG;
                    return $ret;
                }
                $crate::gas::MemoryExtensionResult::Same => (),
            }
        }
    };
}

/// Pops 1 to 4 values from the stack.
#[macro_export]
macro_rules! pop {
    ($interp:expr, $x1:ident) => {
        let Ok($x1) = $interp.stack.pop() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return;
        };
    };
    ($interp:expr, $x1:ident, $x2:ident) => {
        $crate::pop!($interp, $x1);
        $crate::pop!($interp, $x2);
    };
    ($interp:expr, $x1:ident, $x2:ident, $x3:ident) => {
        $crate::pop!($interp, $x1, $x2);
        $crate::pop!($interp, $x3);
    };
    ($interp:expr, $x1:ident, $x2:ident, $x3:ident, $x4:ident) => {
        $crate::pop!($interp, $x1, $x2, $x3);
        $crate::pop!($interp, $x4);
    };
}

/// Pops zero or more values and binds a mutable reference to the new top of
/// the stack.
#[macro_export]
macro_rules! pop_top {
    ($interp:expr, $top:ident) => {
        let Ok($top) = $interp.stack.top() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return;
        };
    };
    ($interp:expr, $x1:ident, $top:ident) => {
        let Ok(($x1, $top)) = $interp.stack.pop_top() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return;
        };
    };
    ($interp:expr, $x1:ident, $x2:ident, $top:ident) => {
        let Ok(($x1, $x2, $top)) = $interp.stack.pop2_top() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return;
        };
    };
}

/// Pops an address (the low 20 bytes of a word) from the stack.
#[macro_export]
macro_rules! pop_address {
    ($interp:expr, $x1:ident) => {
        let Ok($x1) = $interp.stack.pop() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return;
        };
        let $x1 = primitives::Address::from_word(primitives::B256::from($x1));
    };
}

/// Pushes a `U256` value onto the stack.
#[macro_export]
macro_rules! push {
    ($interp:expr, $x:expr) => {
        if let Err(result) = $interp.stack.push($x) {
            $interp.instruction_result = result;
            return;
        }
    };
}

/// Pushes a `B256` value onto the stack as a word.
#[macro_export]
macro_rules! push_b256 {
    ($interp:expr, $x:expr) => {
        if let Err(result) = $interp.stack.push_b256($x) {
            $interp.instruction_result = result;
            return;
        }
    };
}

/// Converts a `U256` value to a `u64`, saturating to `MAX` if the value is
/// too large.
#[macro_export]
macro_rules! as_u64_saturated {
    ($v:expr) => {
        match $v.as_limbs() {
            x => {
                if (x[1] == 0) & (x[2] == 0) & (x[3] == 0) {
                    x[0]
                } else {
                    u64::MAX
                }
            }
        }
    };
}

/// Converts a `U256` value to a `usize`, saturating to `MAX` if the value is
/// too large.
#[macro_export]
macro_rules! as_usize_saturated {
    ($v:expr) => {
        usize::try_from($crate::as_u64_saturated!($v)).unwrap_or(usize::MAX)
    };
}

/// Converts a `U256` value to a `usize`, failing the instruction if the
/// value is too large.
#[macro_export]
macro_rules! as_usize_or_fail {
    ($interp:expr, $v:expr) => {
        $crate::as_usize_or_fail!($interp, $v, $crate::InstructionResult::InvalidOperandOOG)
    };
    ($interp:expr, $v:expr, $reason:expr) => {
        $crate::as_usize_or_fail_ret!($interp, $v, $reason, ())
    };
}

/// Like [`as_usize_or_fail!`], returning `$ret` on failure.
#[macro_export]
macro_rules! as_usize_or_fail_ret {
    ($interp:expr, $v:expr, $ret:expr) => {
        $crate::as_usize_or_fail_ret!(
            $interp,
            $v,
            $crate::InstructionResult::InvalidOperandOOG,
            $ret
        )
    };
    ($interp:expr, $v:expr, $reason:expr, $ret:expr) => {
        match $v.as_limbs() {
            x => {
                if (x[0] > usize::MAX as u64) | (x[1] != 0) | (x[2] != 0) | (x[3] != 0) {
                    $interp.instruction_result = $reason;
                    return $ret;
                }
                x[0] as usize
            }
        }
    };
}

/// Like [`pop!`], returning `$ret` on underflow.
#[macro_export]
macro_rules! pop_ret {
    ($interp:expr, $x1:ident, $ret:expr) => {
        let Ok($x1) = $interp.stack.pop() else {
            $interp.instruction_result = $crate::InstructionResult::StackUnderflow;
            return $ret;
        };
    };
    ($interp:expr, $x1:ident, $x2:ident, $ret:expr) => {
        $crate::pop_ret!($interp, $x1, $ret);
        $crate::pop_ret!($interp, $x2, $ret);
    };
    ($interp:expr, $x1:ident, $x2:ident, $x3:ident, $x4:ident, $ret:expr) => {
        $crate::pop_ret!($interp, $x1, $x2, $ret);
        $crate::pop_ret!($interp, $x3, $ret);
        $crate::pop_ret!($interp, $x4, $ret);
    };
}
