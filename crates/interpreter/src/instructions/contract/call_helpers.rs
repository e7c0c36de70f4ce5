use crate::{gas, Host, InstructionResult, Interpreter};
use core::cmp::min;
use primitives::{Address, Bytes, SpecId};

/// Pops the input and output memory windows of a call from the stack,
/// resizing memory for both, and returns the input bytes together with the
/// output window.
#[inline]
pub fn get_memory_input_and_out_ranges(
    interpreter: &mut Interpreter,
) -> Option<(Bytes, (usize, usize))> {
    pop_ret!(interpreter, in_offset, in_len, out_offset, out_len, None);

    let in_len = as_usize_or_fail_ret!(interpreter, in_len, None);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail_ret!(interpreter, in_offset, None);
        resize_memory!(interpreter, in_offset, in_len, None);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };

    let out_len = as_usize_or_fail_ret!(interpreter, out_len, None);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail_ret!(interpreter, out_offset, None);
        resize_memory!(interpreter, out_offset, out_len, None);
        out_offset
    } else {
        0
    };

    Some((input, (out_offset, out_len)))
}

/// Calculates the gas to forward to a sub-call: charges the call cost to the
/// caller and applies the EIP-150 63/64 rule to the requested limit.
#[inline]
pub fn calc_call_gas<H: Host + ?Sized>(
    interpreter: &mut Interpreter,
    host: &mut H,
    to: Address,
    transfers_value: bool,
    local_gas_limit: u64,
    new_account_accounting: bool,
) -> Option<u64> {
    let Some((is_cold, exists)) = host.load_account(to) else {
        interpreter.instruction_result = InstructionResult::FatalExternalError;
        return None;
    };

    let call_cost = gas::call_cost(
        interpreter.spec_id,
        transfers_value,
        is_cold,
        new_account_accounting && !exists,
    );
    gas!(interpreter, call_cost, None);

    // EIP-150: Gas cost changes for IO-heavy operations
    let gas_limit = if interpreter.spec_enabled(SpecId::TANGERINE) {
        // Take the remaining gas and deduct the 1/64th part of it.
        min(interpreter.gas.remaining_63_of_64_parts(), local_gas_limit)
    } else {
        local_gas_limit
    };

    Some(gas_limit)
}
