//! Big integer modular exponentiation precompile (`0x05`), introduced in
//! Byzantium by EIP-198 and re-priced in Berlin by EIP-2565.

use crate::{
    utilities::{get_right_padded, get_right_padded_vec, left_padding},
    PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress,
};
use alloc::vec::Vec;
use core::cmp::{max, min};
use primitives::{Bytes, U256};

/// EIP-198 modexp.
pub const BYZANTIUM: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(5), byzantium_run);

/// EIP-2565 modexp.
pub const BERLIN: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(5), berlin_run);

/// See [EIP-198](https://eips.ethereum.org/EIPS/eip-198).
pub fn byzantium_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_inner(input, gas_limit, 0, byzantium_gas_calc)
}

/// See [EIP-2565](https://eips.ethereum.org/EIPS/eip-2565).
pub fn berlin_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_inner(input, gas_limit, 200, berlin_gas_calc)
}

fn run_inner<F>(input: &[u8], gas_limit: u64, min_gas: u64, calc_gas: F) -> PrecompileResult
where
    F: FnOnce(u64, u64, u64, &U256) -> u64,
{
    if min_gas > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // The format of the input is:
    // <length_of_BASE> <length_of_EXPONENT> <length_of_MODULUS> <BASE> <EXPONENT> <MODULUS>
    // Where every length is a 32-byte left-padded integer representing the
    // number of bytes that the following value occupies.
    const HEADER_LENGTH: usize = 96;

    let base_len = U256::from_be_bytes(get_right_padded::<32>(input, 0));
    let exp_len = U256::from_be_bytes(get_right_padded::<32>(input, 32));
    let mod_len = U256::from_be_bytes(get_right_padded::<32>(input, 64));

    // Cast base and modulus lengths to usize, it does not make sense to
    // handle larger values.
    let Ok(base_len) = usize::try_from(base_len) else {
        return Err(PrecompileError::ModexpBaseOverflow);
    };
    let Ok(mod_len) = usize::try_from(mod_len) else {
        return Err(PrecompileError::ModexpModOverflow);
    };

    // Special case when both the base and mod lengths are zero.
    if base_len == 0 && mod_len == 0 {
        return Ok(PrecompileOutput::new(min_gas, Bytes::new()));
    }

    let Ok(exp_len) = usize::try_from(exp_len) else {
        return Err(PrecompileError::ModexpExpOverflow);
    };

    // Used to extract the adjusted exponent length.
    let exp_highp_len = min(exp_len, 32);

    // Throw away the header data; only the raw values matter from here on.
    let input = input.get(HEADER_LENGTH..).unwrap_or_default();

    let exp_highp = {
        // Get right-padded bytes so if data.len is less than exp_len we get
        // right-padded zeroes.
        let right_padded_highp = get_right_padded::<32>(input, base_len);
        // If exp_len is less than 32 bytes, take only exp_len bytes and do
        // left padding.
        let out = left_padding::<32>(&right_padded_highp[..exp_highp_len]);
        U256::from_be_bytes(out)
    };

    // Check if we have enough gas.
    let gas_cost = calc_gas(base_len as u64, exp_len as u64, mod_len as u64, &exp_highp);
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // Padding is needed if the input does not contain all 3 values.
    let base = get_right_padded_vec(input, 0, base_len);
    let exponent = get_right_padded_vec(input, base_len, exp_len);
    let modulus = get_right_padded_vec(input, base_len.saturating_add(exp_len), mod_len);

    let output = aurora_engine_modexp::modexp(&base, &exponent, &modulus);

    // The result is left-padded to the modulus length; the output is always
    // at most `mod_len` bytes.
    Ok(PrecompileOutput::new(
        gas_cost,
        left_pad_vec(&output, mod_len).into(),
    ))
}

/// The number of squarings the exponent costs, bounded below by one.
fn calculate_iteration_count(exp_len: u64, exp_highp: &U256) -> u64 {
    let mut iteration_count: u64 = 0;

    if exp_len <= 32 && !exp_highp.is_zero() {
        iteration_count = exp_highp.bit_len() as u64 - 1;
    } else if exp_len > 32 {
        iteration_count = (8u64.saturating_mul(exp_len - 32))
            .saturating_add(max(1, exp_highp.bit_len() as u64) - 1);
    }

    max(iteration_count, 1)
}

/// EIP-198 pricing: the piecewise multiplication-complexity curve divided by
/// the `GQUADDIVISOR` of 20.
fn byzantium_gas_calc(base_len: u64, exp_len: u64, mod_len: u64, exp_highp: &U256) -> u64 {
    // Output of this function is bounded by 2^128.
    fn mul_complexity(x: u64) -> U256 {
        if x <= 64 {
            U256::from(x * x)
        } else if x <= 1024 {
            U256::from(x * x / 4 + 96 * x - 3072)
        } else {
            // Up-cast to avoid overflow.
            let x = U256::from(x);
            let x_sq = x * x;
            x_sq / U256::from(16) + U256::from(480) * x - U256::from(199_680)
        }
    }

    let mul = mul_complexity(max(base_len, mod_len));
    let adjusted_exp_len = calculate_iteration_count(exp_len, exp_highp);
    let gas = (mul * U256::from(adjusted_exp_len)) / U256::from(20);
    if gas.bit_len() > 64 {
        u64::MAX
    } else {
        gas.as_limbs()[0]
    }
}

/// EIP-2565 pricing: word-based multiplication complexity divided by 3, with
/// a floor of 200 gas.
fn berlin_gas_calc(base_len: u64, exp_len: u64, mod_len: u64, exp_highp: &U256) -> u64 {
    fn calculate_multiplication_complexity(base_len: u64, mod_len: u64) -> U256 {
        let max_len = max(base_len, mod_len);
        let words = max_len.div_ceil(8);
        let words = U256::from(words);
        words * words
    }

    let multiplication_complexity = calculate_multiplication_complexity(base_len, mod_len);
    let iteration_count = calculate_iteration_count(exp_len, exp_highp);
    let gas = (multiplication_complexity * U256::from(iteration_count)) / U256::from(3);
    if gas.bit_len() > 64 {
        u64::MAX
    } else {
        max(200, gas.as_limbs()[0])
    }
}

fn left_pad_vec(data: &[u8], len: usize) -> Vec<u8> {
    if data.len() >= len {
        return data.to_vec();
    }
    let mut padded = alloc::vec![0; len];
    padded[len - data.len()..].copy_from_slice(data);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::hex;

    // 3 ** (2^256 - 2^32 - 978) % (2^256 - 2^32 - 977), the EIP-198 example:
    // a Fermat test against the secp256k1 field prime, expected result 1.
    const FERMAT_INPUT: &str = "\
        0000000000000000000000000000000000000000000000000000000000000001\
        0000000000000000000000000000000000000000000000000000000000000020\
        0000000000000000000000000000000000000000000000000000000000000020\
        03\
        fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e\
        fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";

    #[test]
    fn fermat_little_theorem() {
        let input = hex::decode(FERMAT_INPUT.replace(char::is_whitespace, "")).unwrap();
        let res = berlin_run(&input, 100_000).unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(res.bytes.as_ref(), &expected);
        assert_eq!(res.gas_used, 1360);
    }

    #[test]
    fn empty_input_costs_min_gas() {
        let res = berlin_run(&[], 200).unwrap();
        assert_eq!(res.gas_used, 200);
        assert!(res.bytes.is_empty());

        // Byzantium had no floor.
        let res = byzantium_run(&[], 10).unwrap();
        assert_eq!(res.gas_used, 0);
    }

    #[test]
    fn output_is_padded_to_modulus_length() {
        // 2 ** 3 % 16 = 8, with a 4-byte modulus.
        let input = hex::decode(
            "0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000000000000000000000000000000000000000000004\
             020300000010",
        )
        .unwrap();
        let res = berlin_run(&input, 100_000).unwrap();
        assert_eq!(res.bytes.as_ref(), &[0, 0, 0, 8]);
    }

    #[test]
    fn insufficient_gas_is_an_error() {
        let input = hex::decode(FERMAT_INPUT.replace(char::is_whitespace, "")).unwrap();
        assert_eq!(berlin_run(&input, 100), Err(PrecompileError::OutOfGas));
    }
}
