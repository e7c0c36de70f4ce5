//! `ecrecover` precompile (`0x01`).
//!
//! Input format: `[32 bytes message hash][32 bytes v][32 bytes r][32 bytes s]`,
//! right-padded with zeroes. Output: the recovered address, left-padded to 32
//! bytes, or empty output on any recovery failure.

use crate::{
    utilities::get_right_padded, PrecompileError, PrecompileOutput, PrecompileResult,
    PrecompileWithAddress,
};
use k256::ecdsa::{Error, RecoveryId, Signature, VerifyingKey};
use primitives::{alloy_primitives::B512, keccak256, Bytes, B256};

/// `ecrecover` precompile, containing address and function to run.
pub const ECRECOVER: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(1), ec_recover_run);

/// Base gas cost of the `ecrecover` precompile.
pub const ECRECOVER_BASE: u64 = 3_000;

/// `ecrecover` precompile function. See [this module docs](self) for the
/// input and output format.
pub fn ec_recover_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    if ECRECOVER_BASE > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = get_right_padded::<128>(input, 0);

    // `v` must be a 32-byte big-endian integer equal to 0, 1, 27 or 28.
    if !(input[32..63].iter().all(|&b| b == 0) && matches!(input[63], 0 | 1 | 27 | 28)) {
        return Ok(PrecompileOutput::new(ECRECOVER_BASE, Bytes::new()));
    }

    let msg = B256::from_slice(&input[0..32]);
    let recid = if input[63] >= 27 {
        input[63] - 27
    } else {
        input[63]
    };
    let sig = B512::from_slice(&input[64..128]);

    let out = ecrecover(&sig, recid, &msg)
        .map(|address| address.to_vec().into())
        .unwrap_or_default();
    Ok(PrecompileOutput::new(ECRECOVER_BASE, out))
}

/// Recovers the signer address of the given prehashed message, returned as a
/// left-padded 32-byte hash.
pub fn ecrecover(sig: &B512, mut recid: u8, msg: &B256) -> Result<B256, Error> {
    // Parse the signature.
    let mut sig = Signature::from_slice(sig.as_slice())?;

    // Normalize the signature; a high-s signature flips the recovery id.
    if let Some(sig_normalized) = sig.normalize_s() {
        sig = sig_normalized;
        recid ^= 1;
    }
    let recid = RecoveryId::from_byte(recid).expect("recovery ID is valid");

    // Recover the public key and hash it.
    let recovered_key = VerifyingKey::recover_from_prehash(&msg[..], &sig, recid)?;
    let mut hash = keccak256(&recovered_key.to_encoded_point(false).as_bytes()[1..]);

    // Truncate to the 20-byte address.
    hash[..12].fill(0);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::hex;

    // Test vector from geth's crypto tests.
    const INPUT: &str = "456e9aea5e197a1f1af7a3e85a3212fa4049a3ba34c2289b4c860fc0b0c64ef3000000000000000000000000000000000000000000000000000000000000001c9242685bf161793cc25603c231bc2f568eb630ea16aa137d2664ac80388256084f8ae3bd7535248d0bd448298cc2e2071e56992d0774dc340c368ae950852ada";
    const EXPECTED: &str = "0000000000000000000000007156526fbd7a3c72969b54f64e42c10fbb768c8a";

    #[test]
    fn recovers_known_address() {
        let input = hex::decode(INPUT).unwrap();
        let res = ec_recover_run(&input, 5000).unwrap();
        assert_eq!(res.gas_used, 3000);
        assert_eq!(hex::encode(&res.bytes), EXPECTED);
    }

    #[test]
    fn invalid_v_returns_empty_output() {
        let mut input = hex::decode(INPUT).unwrap();
        input[63] = 29;
        let res = ec_recover_run(&input, 5000).unwrap();
        assert!(res.bytes.is_empty());
    }

    #[test]
    fn zero_based_recovery_id_is_accepted() {
        let mut input = hex::decode(INPUT).unwrap();
        // 0x1c (28) and 1 address the same key parity.
        input[63] = 1;
        let res = ec_recover_run(&input, 5000).unwrap();
        assert_eq!(hex::encode(&res.bytes), EXPECTED);
    }

    #[test]
    fn out_of_gas() {
        assert_eq!(
            ec_recover_run(&[], ECRECOVER_BASE - 1),
            Err(PrecompileError::OutOfGas)
        );
    }
}
