//! Hash precompiles: SHA-256 (`0x02`) and RIPEMD-160 (`0x03`).

use super::calc_linear_cost_u32;
use crate::{PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress};
use primitives::Bytes;
use ripemd::Digest;

/// SHA-256 precompile.
pub const SHA256: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(2), sha256_run);

/// RIPEMD-160 precompile.
pub const RIPEMD160: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(3), ripemd160_run);

/// Computes the SHA-256 hash of the input data.
///
/// See: <https://ethereum.github.io/yellowpaper/paper.pdf>
pub fn sha256_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    let cost = calc_linear_cost_u32(input.len(), 60, 12);
    if cost > gas_limit {
        Err(PrecompileError::OutOfGas)
    } else {
        let output = sha2::Sha256::digest(input);
        Ok(PrecompileOutput::new(cost, output.to_vec().into()))
    }
}

/// Computes the RIPEMD-160 hash of the input data.
///
/// The 20-byte digest is returned left-padded to 32 bytes.
///
/// See: <https://ethereum.github.io/yellowpaper/paper.pdf>
pub fn ripemd160_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    let gas_used = calc_linear_cost_u32(input.len(), 600, 120);
    if gas_used > gas_limit {
        Err(PrecompileError::OutOfGas)
    } else {
        let mut hasher = ripemd::Ripemd160::new();
        hasher.update(input);

        let mut output = [0u8; 32];
        hasher.finalize_into((&mut output[12..]).into());
        Ok(PrecompileOutput::new(gas_used, Bytes::copy_from_slice(&output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::hex;

    #[test]
    fn sha256_of_empty_input() {
        let res = sha256_run(&[], 100).unwrap();
        assert_eq!(res.gas_used, 60);
        assert_eq!(
            hex::encode(&res.bytes),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn ripemd160_is_left_padded() {
        let res = ripemd160_run(&[], 1000).unwrap();
        assert_eq!(res.gas_used, 600);
        assert_eq!(res.bytes.len(), 32);
        assert_eq!(&res.bytes[..12], &[0u8; 12]);
        assert_eq!(
            hex::encode(&res.bytes[12..]),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn out_of_gas() {
        assert_eq!(sha256_run(&[], 59), Err(PrecompileError::OutOfGas));
        assert_eq!(ripemd160_run(&[], 599), Err(PrecompileError::OutOfGas));
    }
}
