//! The 256-entry instruction dispatch table.

use crate::{
    instructions::{arithmetic, bitwise, contract, control, host, host_env, memory, stack, system},
    Host, Interpreter, STACK_LIMIT,
};
pub use bytecode::opcode::{OpCode, OPCODE_JUMPMAP};
use bytecode::opcode::*;

/// An instruction handler.
pub type Instruction<H> = fn(&mut Interpreter, &mut H);

/// A dispatch table entry: the handler together with the maximum stack
/// height at which the handler cannot overflow the stack.
///
/// `max_stack` is `STACK_LIMIT + pops - pushes`; the interpreter rejects
/// dispatch when the stack is taller than that, which makes overflow after
/// the handler's pops and pushes impossible.
pub struct Operation<H: Host + ?Sized> {
    pub execute: Instruction<H>,
    pub max_stack: u16,
}

impl<H: Host + ?Sized> Clone for Operation<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: Host + ?Sized> Copy for Operation<H> {}

/// The instruction dispatch table, indexed by opcode.
pub type InstructionTable<H> = [Operation<H>; 256];

/// Builds the instruction table for the given host type.
///
/// Fork gating happens inside the handlers, against the interpreter's spec;
/// the table itself is spec independent.
pub const fn make_instruction_table<H: Host + ?Sized>() -> InstructionTable<H> {
    macro_rules! set {
        ($table:ident, $opcode:ident, $handler:expr, $pop:expr, $push:expr) => {
            $table[$opcode as usize] = Operation {
                execute: $handler,
                max_stack: (STACK_LIMIT + $pop - $push) as u16,
            };
        };
    }

    let mut table: InstructionTable<H> = [Operation {
        execute: control::unknown::<H>,
        max_stack: STACK_LIMIT as u16,
    }; 256];

    set!(table, STOP, control::stop::<H>, 0, 0);
    set!(table, ADD, arithmetic::add::<H>, 2, 1);
    set!(table, MUL, arithmetic::mul::<H>, 2, 1);
    set!(table, SUB, arithmetic::sub::<H>, 2, 1);
    set!(table, DIV, arithmetic::div::<H>, 2, 1);
    set!(table, SDIV, arithmetic::sdiv::<H>, 2, 1);
    set!(table, MOD, arithmetic::rem::<H>, 2, 1);
    set!(table, SMOD, arithmetic::smod::<H>, 2, 1);
    set!(table, ADDMOD, arithmetic::addmod::<H>, 3, 1);
    set!(table, MULMOD, arithmetic::mulmod::<H>, 3, 1);
    set!(table, EXP, arithmetic::exp::<H>, 2, 1);
    set!(table, SIGNEXTEND, arithmetic::signextend::<H>, 2, 1);

    set!(table, LT, bitwise::lt::<H>, 2, 1);
    set!(table, GT, bitwise::gt::<H>, 2, 1);
    set!(table, SLT, bitwise::slt::<H>, 2, 1);
    set!(table, SGT, bitwise::sgt::<H>, 2, 1);
    set!(table, EQ, bitwise::eq::<H>, 2, 1);
    set!(table, ISZERO, bitwise::iszero::<H>, 1, 1);
    set!(table, AND, bitwise::bitand::<H>, 2, 1);
    set!(table, OR, bitwise::bitor::<H>, 2, 1);
    set!(table, XOR, bitwise::bitxor::<H>, 2, 1);
    set!(table, NOT, bitwise::not::<H>, 1, 1);
    set!(table, BYTE, bitwise::byte::<H>, 2, 1);
    set!(table, SHL, bitwise::shl::<H>, 2, 1);
    set!(table, SHR, bitwise::shr::<H>, 2, 1);
    set!(table, SAR, bitwise::sar::<H>, 2, 1);

    set!(table, KECCAK256, system::keccak256::<H>, 2, 1);

    set!(table, ADDRESS, system::address::<H>, 0, 1);
    set!(table, BALANCE, host::balance::<H>, 1, 1);
    set!(table, ORIGIN, host_env::origin::<H>, 0, 1);
    set!(table, CALLER, system::caller::<H>, 0, 1);
    set!(table, CALLVALUE, system::callvalue::<H>, 0, 1);
    set!(table, CALLDATALOAD, system::calldataload::<H>, 1, 1);
    set!(table, CALLDATASIZE, system::calldatasize::<H>, 0, 1);
    set!(table, CALLDATACOPY, system::calldatacopy::<H>, 3, 0);
    set!(table, CODESIZE, system::codesize::<H>, 0, 1);
    set!(table, CODECOPY, system::codecopy::<H>, 3, 0);
    set!(table, GASPRICE, host_env::gasprice::<H>, 0, 1);
    set!(table, EXTCODESIZE, host::extcodesize::<H>, 1, 1);
    set!(table, EXTCODECOPY, host::extcodecopy::<H>, 4, 0);
    set!(table, RETURNDATASIZE, system::returndatasize::<H>, 0, 1);
    set!(table, RETURNDATACOPY, system::returndatacopy::<H>, 3, 0);
    set!(table, EXTCODEHASH, host::extcodehash::<H>, 1, 1);

    set!(table, BLOCKHASH, host::blockhash::<H>, 1, 1);
    set!(table, COINBASE, host_env::coinbase::<H>, 0, 1);
    set!(table, TIMESTAMP, host_env::timestamp::<H>, 0, 1);
    set!(table, NUMBER, host_env::block_number::<H>, 0, 1);
    set!(table, DIFFICULTY, host_env::difficulty::<H>, 0, 1);
    set!(table, GASLIMIT, host_env::gaslimit::<H>, 0, 1);
    set!(table, CHAINID, host_env::chainid::<H>, 0, 1);
    set!(table, SELFBALANCE, host::selfbalance::<H>, 0, 1);
    set!(table, BASEFEE, host_env::basefee::<H>, 0, 1);
    set!(table, BLOBHASH, host_env::blob_hash::<H>, 1, 1);
    set!(table, BLOBBASEFEE, host_env::blob_basefee::<H>, 0, 1);

    set!(table, POP, stack::pop::<H>, 1, 0);
    set!(table, MLOAD, memory::mload::<H>, 1, 1);
    set!(table, MSTORE, memory::mstore::<H>, 2, 0);
    set!(table, MSTORE8, memory::mstore8::<H>, 2, 0);
    set!(table, SLOAD, host::sload::<H>, 1, 1);
    set!(table, SSTORE, host::sstore::<H>, 2, 0);
    set!(table, JUMP, control::jump::<H>, 1, 0);
    set!(table, JUMPI, control::jumpi::<H>, 2, 0);
    set!(table, PC, control::pc::<H>, 0, 1);
    set!(table, MSIZE, memory::msize::<H>, 0, 1);
    set!(table, GAS, system::gas::<H>, 0, 1);
    set!(table, JUMPDEST, control::jumpdest::<H>, 0, 0);
    set!(table, TLOAD, host::tload::<H>, 1, 1);
    set!(table, TSTORE, host::tstore::<H>, 2, 0);
    set!(table, MCOPY, memory::mcopy::<H>, 3, 0);

    set!(table, PUSH0, stack::push0::<H>, 0, 1);
    set!(table, PUSH1, stack::push::<1, H>, 0, 1);
    set!(table, PUSH2, stack::push::<2, H>, 0, 1);
    set!(table, PUSH3, stack::push::<3, H>, 0, 1);
    set!(table, PUSH4, stack::push::<4, H>, 0, 1);
    set!(table, PUSH5, stack::push::<5, H>, 0, 1);
    set!(table, PUSH6, stack::push::<6, H>, 0, 1);
    set!(table, PUSH7, stack::push::<7, H>, 0, 1);
    set!(table, PUSH8, stack::push::<8, H>, 0, 1);
    set!(table, PUSH9, stack::push::<9, H>, 0, 1);
    set!(table, PUSH10, stack::push::<10, H>, 0, 1);
    set!(table, PUSH11, stack::push::<11, H>, 0, 1);
    set!(table, PUSH12, stack::push::<12, H>, 0, 1);
    set!(table, PUSH13, stack::push::<13, H>, 0, 1);
    set!(table, PUSH14, stack::push::<14, H>, 0, 1);
    set!(table, PUSH15, stack::push::<15, H>, 0, 1);
    set!(table, PUSH16, stack::push::<16, H>, 0, 1);
    set!(table, PUSH17, stack::push::<17, H>, 0, 1);
    set!(table, PUSH18, stack::push::<18, H>, 0, 1);
    set!(table, PUSH19, stack::push::<19, H>, 0, 1);
    set!(table, PUSH20, stack::push::<20, H>, 0, 1);
    set!(table, PUSH21, stack::push::<21, H>, 0, 1);
    set!(table, PUSH22, stack::push::<22, H>, 0, 1);
    set!(table, PUSH23, stack::push::<23, H>, 0, 1);
    set!(table, PUSH24, stack::push::<24, H>, 0, 1);
    set!(table, PUSH25, stack::push::<25, H>, 0, 1);
    set!(table, PUSH26, stack::push::<26, H>, 0, 1);
    set!(table, PUSH27, stack::push::<27, H>, 0, 1);
    set!(table, PUSH28, stack::push::<28, H>, 0, 1);
    set!(table, PUSH29, stack::push::<29, H>, 0, 1);
    set!(table, PUSH30, stack::push::<30, H>, 0, 1);
    set!(table, PUSH31, stack::push::<31, H>, 0, 1);
    set!(table, PUSH32, stack::push::<32, H>, 0, 1);

    set!(table, DUP1, stack::dup::<1, H>, 0, 1);
    set!(table, DUP2, stack::dup::<2, H>, 0, 1);
    set!(table, DUP3, stack::dup::<3, H>, 0, 1);
    set!(table, DUP4, stack::dup::<4, H>, 0, 1);
    set!(table, DUP5, stack::dup::<5, H>, 0, 1);
    set!(table, DUP6, stack::dup::<6, H>, 0, 1);
    set!(table, DUP7, stack::dup::<7, H>, 0, 1);
    set!(table, DUP8, stack::dup::<8, H>, 0, 1);
    set!(table, DUP9, stack::dup::<9, H>, 0, 1);
    set!(table, DUP10, stack::dup::<10, H>, 0, 1);
    set!(table, DUP11, stack::dup::<11, H>, 0, 1);
    set!(table, DUP12, stack::dup::<12, H>, 0, 1);
    set!(table, DUP13, stack::dup::<13, H>, 0, 1);
    set!(table, DUP14, stack::dup::<14, H>, 0, 1);
    set!(table, DUP15, stack::dup::<15, H>, 0, 1);
    set!(table, DUP16, stack::dup::<16, H>, 0, 1);

    set!(table, SWAP1, stack::swap::<1, H>, 0, 0);
    set!(table, SWAP2, stack::swap::<2, H>, 0, 0);
    set!(table, SWAP3, stack::swap::<3, H>, 0, 0);
    set!(table, SWAP4, stack::swap::<4, H>, 0, 0);
    set!(table, SWAP5, stack::swap::<5, H>, 0, 0);
    set!(table, SWAP6, stack::swap::<6, H>, 0, 0);
    set!(table, SWAP7, stack::swap::<7, H>, 0, 0);
    set!(table, SWAP8, stack::swap::<8, H>, 0, 0);
    set!(table, SWAP9, stack::swap::<9, H>, 0, 0);
    set!(table, SWAP10, stack::swap::<10, H>, 0, 0);
    set!(table, SWAP11, stack::swap::<11, H>, 0, 0);
    set!(table, SWAP12, stack::swap::<12, H>, 0, 0);
    set!(table, SWAP13, stack::swap::<13, H>, 0, 0);
    set!(table, SWAP14, stack::swap::<14, H>, 0, 0);
    set!(table, SWAP15, stack::swap::<15, H>, 0, 0);
    set!(table, SWAP16, stack::swap::<16, H>, 0, 0);

    set!(table, LOG0, host::log::<0, H>, 2, 0);
    set!(table, LOG1, host::log::<1, H>, 3, 0);
    set!(table, LOG2, host::log::<2, H>, 4, 0);
    set!(table, LOG3, host::log::<3, H>, 5, 0);
    set!(table, LOG4, host::log::<4, H>, 6, 0);

    set!(table, CREATE, contract::create::<false, H>, 3, 1);
    set!(table, CALL, contract::call::<H>, 7, 1);
    set!(table, CALLCODE, contract::call_code::<H>, 7, 1);
    set!(table, RETURN, control::ret::<H>, 2, 0);
    set!(table, DELEGATECALL, contract::delegate_call::<H>, 6, 1);
    set!(table, CREATE2, contract::create::<true, H>, 4, 1);
    set!(table, STATICCALL, contract::static_call::<H>, 6, 1);
    set!(table, REVERT, control::revert::<H>, 2, 0);
    set!(table, INVALID, control::invalid::<H>, 0, 0);
    set!(table, SELFDESTRUCT, host::selfdestruct::<H>, 1, 0);

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PlainHost;

    #[test]
    fn unassigned_entries_are_unknown() {
        let table = make_instruction_table::<PlainHost>();
        // 0x0C..0x0F are holes in the opcode map.
        assert_eq!(
            table[0x0C].execute as usize,
            control::unknown::<PlainHost> as usize
        );
        assert_eq!(table[0x0C].max_stack as usize, STACK_LIMIT);
    }

    #[test]
    fn max_stack_matches_net_stack_effect() {
        let table = make_instruction_table::<PlainHost>();
        // PUSH1 pushes one item: the handler must not run on a full stack.
        assert_eq!(table[PUSH1 as usize].max_stack as usize, STACK_LIMIT - 1);
        // ADD pops two and pushes one.
        assert_eq!(table[ADD as usize].max_stack as usize, STACK_LIMIT + 1);
        // SWAP has no net effect.
        assert_eq!(table[SWAP1 as usize].max_stack as usize, STACK_LIMIT);
        // LOG4 pops six.
        assert_eq!(table[LOG4 as usize].max_stack as usize, STACK_LIMIT + 6);
    }
}
