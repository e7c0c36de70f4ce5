use super::i256::{i256_div, i256_mod};
use crate::{gas, Host, Interpreter};
use primitives::U256;

pub fn add<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop_top!(interpreter, op1, op2);
    *op2 = op1.wrapping_add(*op2);
}

pub fn mul<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, op1, op2);
    *op2 = op1.wrapping_mul(*op2);
}

pub fn sub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    pop_top!(interpreter, op1, op2);
    *op2 = op1.wrapping_sub(*op2);
}

pub fn div<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, op1, op2);
    if !op2.is_zero() {
        *op2 = op1.wrapping_div(*op2);
    }
}

pub fn sdiv<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, op1, op2);
    *op2 = i256_div(op1, *op2);
}

pub fn rem<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, op1, op2);
    if !op2.is_zero() {
        *op2 = op1.wrapping_rem(*op2);
    }
}

pub fn smod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, op1, op2);
    *op2 = i256_mod(op1, *op2);
}

pub fn addmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::MID);
    pop_top!(interpreter, op1, op2, op3);
    *op3 = op1.add_mod(op2, *op3);
}

pub fn mulmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::MID);
    pop_top!(interpreter, op1, op2, op3);
    *op3 = op1.mul_mod(op2, *op3);
}

pub fn exp<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    let spec_id = interpreter.spec_id;
    pop_top!(interpreter, op1, op2);
    gas_or_fail!(interpreter, gas::exp_cost(spec_id, *op2));
    *op2 = op1.pow(*op2);
}

/// Implements the `SIGNEXTEND` opcode as defined in the Ethereum Yellow Paper.
///
/// Extends the sign of a `b + 1` byte two's complement number to a full word,
/// where `b` is the first operand. For `b >= 31` the value is unchanged.
pub fn signextend<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::LOW);
    pop_top!(interpreter, ext, x);
    if ext < U256::from(31) {
        let ext = ext.as_limbs()[0];
        let bit_index = (8 * ext + 7) as usize;
        let bit = x.bit(bit_index);
        let mask = (U256::from(1) << bit_index) - U256::from(1);
        *x = if bit { *x | !mask } else { *x & mask };
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{run_expect_stack, run_expect_halt};
    use crate::InstructionResult;
    use bytecode::opcode;
    use primitives::U256;

    #[test]
    fn wrapping_arithmetic() {
        // (2^256 - 1) + 2 wraps to 1.
        run_expect_stack(
            &[
                opcode::PUSH1,
                0x02,
                opcode::PUSH32,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
                opcode::ADD,
            ],
            U256::from(1),
        );
    }

    #[test]
    fn division_by_zero_is_zero() {
        // 5 / 0 => 0
        run_expect_stack(
            &[opcode::PUSH1, 0x00, opcode::PUSH1, 0x05, opcode::DIV],
            U256::ZERO,
        );
        // 5 % 0 => 0
        run_expect_stack(
            &[opcode::PUSH1, 0x00, opcode::PUSH1, 0x05, opcode::MOD],
            U256::ZERO,
        );
    }

    #[test]
    fn addmod_mulmod() {
        // (10 + 10) % 8 = 4
        run_expect_stack(
            &[
                opcode::PUSH1, 0x08,
                opcode::PUSH1, 0x0A,
                opcode::PUSH1, 0x0A,
                opcode::ADDMOD,
            ],
            U256::from(4),
        );
        // (10 * 10) % 8 = 4
        run_expect_stack(
            &[
                opcode::PUSH1, 0x08,
                opcode::PUSH1, 0x0A,
                opcode::PUSH1, 0x0A,
                opcode::MULMOD,
            ],
            U256::from(4),
        );
    }

    #[test]
    fn exponentiation() {
        // 2 ** 10 = 1024
        run_expect_stack(
            &[opcode::PUSH1, 0x0A, opcode::PUSH1, 0x02, opcode::EXP],
            U256::from(1024),
        );
    }

    #[test]
    fn signextend_one_byte() {
        // signextend(0, 0xFF) = -1
        run_expect_stack(
            &[opcode::PUSH1, 0xFF, opcode::PUSH1, 0x00, opcode::SIGNEXTEND],
            U256::MAX,
        );
        // signextend(0, 0x7F) = 0x7F
        run_expect_stack(
            &[opcode::PUSH1, 0x7F, opcode::PUSH1, 0x00, opcode::SIGNEXTEND],
            U256::from(0x7F),
        );
    }

    #[test]
    fn underflow_is_reported() {
        run_expect_halt(&[opcode::ADD], InstructionResult::StackUnderflow);
    }
}
