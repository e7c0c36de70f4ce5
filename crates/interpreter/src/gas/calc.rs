use super::constants::*;
use crate::SelfDestructResult;
use primitives::{AccessListItem, SpecId, U256};

/// `const` Option `?`.
macro_rules! tri {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}

/// Converts a length in bytes to the number of 32-byte words, rounding up.
#[inline]
pub const fn num_words(len: u64) -> u64 {
    len.div_ceil(32)
}

/// Memory expansion cost for the given number of 32-byte words.
#[inline]
pub const fn memory_gas(words: usize) -> u64 {
    let words = words as u64;
    MEMORY
        .saturating_mul(words)
        .saturating_add(words.saturating_mul(words) / 512)
}

/// Calculates the per-word cost of a buffer of `len` bytes.
#[inline]
pub const fn cost_per_word(len: u64, multiple: u64) -> Option<u64> {
    multiple.checked_mul(num_words(len))
}

/// `KECCAK256` opcode cost calculation.
#[inline]
pub const fn keccak256_cost(len: u64) -> Option<u64> {
    KECCAK256.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

/// `*COPY` opcodes cost calculation.
#[inline]
pub const fn verylowcopy_cost(len: u64) -> Option<u64> {
    VERYLOW.checked_add(tri!(cost_per_word(len, COPY)))
}

/// `LOG` opcode cost calculation.
#[inline]
pub const fn log_cost(n: u8, len: u64) -> Option<u64> {
    tri!(LOG.checked_add(tri!(LOGDATA.checked_mul(len)))).checked_add(LOGTOPIC * n as u64)
}

/// `CREATE2` opcode cost calculation.
#[inline]
pub const fn create2_cost(len: u64) -> Option<u64> {
    CREATE.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

/// EIP-3860: Limit and meter initcode.
///
/// Extra gas cost of 2 for every 32-byte chunk of initcode.
///
/// This cannot overflow as the initcode length is assumed to be checked.
#[inline]
pub const fn initcode_cost(len: u64) -> u64 {
    let Some(cost) = cost_per_word(len, INITCODE_WORD_COST) else {
        panic!("initcode cost overflow")
    };
    cost
}

#[inline]
const fn log2floor(value: U256) -> u64 {
    let mut l: u64 = 256;
    let mut i = 3;
    loop {
        if value.as_limbs()[i] == 0u64 {
            l -= 64;
        } else {
            l -= value.as_limbs()[i].leading_zeros() as u64;
            if l == 0 {
                return l;
            } else {
                return l - 1;
            }
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    l
}

/// `EXP` opcode cost calculation.
#[inline]
pub fn exp_cost(spec_id: SpecId, power: U256) -> Option<u64> {
    if power.is_zero() {
        Some(EXP)
    } else {
        // EIP-160: EXP cost increase
        let gas_byte = U256::from(if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            50
        } else {
            10
        });
        let gas = U256::from(EXP)
            .checked_add(gas_byte.checked_mul(U256::from(log2floor(power) / 8 + 1))?)?;

        u64::try_from(gas).ok()
    }
}

/// Berlin warm and cold storage access cost for account access.
#[inline]
pub const fn warm_cold_cost(is_cold: bool) -> u64 {
    if is_cold {
        COLD_ACCOUNT_ACCESS_COST
    } else {
        WARM_STORAGE_READ_COST
    }
}

/// Account access cost of `BALANCE`, `EXTCODESIZE` and `EXTCODEHASH`.
#[inline]
pub const fn account_access_gas(spec_id: SpecId, is_cold: bool) -> u64 {
    if spec_id.is_enabled_in(SpecId::BERLIN) {
        warm_cold_cost(is_cold)
    } else if spec_id.is_enabled_in(SpecId::ISTANBUL) {
        // EIP-1884: Repricing for trie-size-dependent opcodes
        700
    } else if spec_id.is_enabled_in(SpecId::TANGERINE) {
        400
    } else {
        20
    }
}

/// `EXTCODECOPY` opcode cost calculation.
#[inline]
pub const fn extcodecopy_cost(spec_id: SpecId, len: u64, is_cold: bool) -> Option<u64> {
    let base_gas = if spec_id.is_enabled_in(SpecId::BERLIN) {
        warm_cold_cost(is_cold)
    } else if spec_id.is_enabled_in(SpecId::TANGERINE) {
        700
    } else {
        20
    };
    base_gas.checked_add(tri!(cost_per_word(len, COPY)))
}

/// `SLOAD` opcode cost calculation.
#[inline]
pub const fn sload_cost(spec_id: SpecId, is_cold: bool) -> u64 {
    if spec_id.is_enabled_in(SpecId::BERLIN) {
        if is_cold {
            COLD_SLOAD_COST
        } else {
            WARM_STORAGE_READ_COST
        }
    } else if spec_id.is_enabled_in(SpecId::ISTANBUL) {
        // EIP-1884: Repricing for trie-size-dependent opcodes
        ISTANBUL_SLOAD_GAS
    } else if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        200
    } else {
        50
    }
}

/// `SSTORE` opcode cost calculation.
///
/// Returns `None` when the Istanbul stipend rule applies: an SSTORE with
/// remaining gas at or below the call stipend fails with out of gas
/// (EIP-1706/EIP-2200).
#[inline]
pub fn sstore_cost(
    spec_id: SpecId,
    original: U256,
    current: U256,
    new: U256,
    gas: u64,
    is_cold: bool,
) -> Option<u64> {
    // EIP-1706: Disable SSTORE with gasleft lower than call stipend
    if spec_id.is_enabled_in(SpecId::ISTANBUL) && gas <= CALL_STIPEND {
        return None;
    }

    if spec_id.is_enabled_in(SpecId::BERLIN) {
        let mut gas_cost = istanbul_sstore_cost::<WARM_STORAGE_READ_COST, WARM_SSTORE_RESET>(
            original, current, new,
        );
        if is_cold {
            gas_cost += COLD_SLOAD_COST;
        }
        Some(gas_cost)
    } else if spec_id.is_enabled_in(SpecId::ISTANBUL) {
        Some(istanbul_sstore_cost::<ISTANBUL_SLOAD_GAS, SSTORE_RESET>(
            original, current, new,
        ))
    } else {
        Some(frontier_sstore_cost(current, new))
    }
}

/// EIP-2200: Structured Definitions for Net Gas Metering.
#[inline]
fn istanbul_sstore_cost<const SLOAD_GAS: u64, const SSTORE_RESET_GAS: u64>(
    original: U256,
    current: U256,
    new: U256,
) -> u64 {
    if new == current {
        SLOAD_GAS
    } else if original == current && original.is_zero() {
        SSTORE_SET
    } else if original == current {
        SSTORE_RESET_GAS
    } else {
        SLOAD_GAS
    }
}

/// Frontier sstore cost just has the two cases of set and reset values.
#[inline]
fn frontier_sstore_cost(current: U256, new: U256) -> u64 {
    if current.is_zero() && !new.is_zero() {
        SSTORE_SET
    } else {
        SSTORE_RESET
    }
}

/// `SSTORE` opcode refund calculation.
#[allow(clippy::collapsible_else_if)]
#[inline]
pub fn sstore_refund(spec_id: SpecId, original: U256, current: U256, new: U256) -> i64 {
    if spec_id.is_enabled_in(SpecId::ISTANBUL) {
        // EIP-3529: Reduction in refunds
        let sstore_clears_schedule = if spec_id.is_enabled_in(SpecId::LONDON) {
            (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64
        } else {
            REFUND_SSTORE_CLEARS
        };
        if current == new {
            0
        } else {
            if original == current && new.is_zero() {
                sstore_clears_schedule
            } else {
                let mut refund = 0;

                if !original.is_zero() {
                    if current.is_zero() {
                        refund -= sstore_clears_schedule;
                    } else if new.is_zero() {
                        refund += sstore_clears_schedule;
                    }
                }

                if original == new {
                    let (gas_sstore_reset, gas_sload) = if spec_id.is_enabled_in(SpecId::BERLIN) {
                        (SSTORE_RESET - COLD_SLOAD_COST, WARM_STORAGE_READ_COST)
                    } else {
                        (SSTORE_RESET, sload_cost(spec_id, false))
                    };
                    if original.is_zero() {
                        refund += (SSTORE_SET - gas_sload) as i64;
                    } else {
                        refund += (gas_sstore_reset - gas_sload) as i64;
                    }
                }

                refund
            }
        }
    } else {
        if !current.is_zero() && new.is_zero() {
            REFUND_SSTORE_CLEARS
        } else {
            0
        }
    }
}

/// `SELFDESTRUCT` opcode cost calculation.
#[inline]
pub const fn selfdestruct_cost(spec_id: SpecId, res: &SelfDestructResult) -> u64 {
    // EIP-161: State trie clearing (invariant-preserving alternative)
    let should_charge_topup = if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
        res.had_value && !res.target_exists
    } else {
        !res.target_exists
    };

    // EIP-150: Gas cost changes for IO-heavy operations
    let selfdestruct_gas_topup =
        if spec_id.is_enabled_in(SpecId::TANGERINE) && should_charge_topup {
            25000
        } else {
            0
        };

    // EIP-150: Gas cost changes for IO-heavy operations
    let selfdestruct_gas = if spec_id.is_enabled_in(SpecId::TANGERINE) {
        5000
    } else {
        0
    };

    let mut gas = selfdestruct_gas + selfdestruct_gas_topup;
    if spec_id.is_enabled_in(SpecId::BERLIN) && res.is_cold {
        gas += COLD_ACCOUNT_ACCESS_COST
    }
    gas
}

/// Calculates the call gas cost for the call instruction.
///
/// There are three kinds of gas:
/// * Account access gas. After Berlin it can be cold or warm.
/// * Transfer value gas. Charged when value is transferred and the target
///   account balance is updated.
/// * New account gas, when the account does not exist and needs to be
///   created. After Spurious Dragon this is only charged if value is
///   transferred.
#[inline]
pub const fn call_cost(
    spec_id: SpecId,
    transfers_value: bool,
    is_cold: bool,
    new_account_accounting: bool,
) -> u64 {
    // Account access.
    let mut gas = if spec_id.is_enabled_in(SpecId::BERLIN) {
        warm_cold_cost(is_cold)
    } else if spec_id.is_enabled_in(SpecId::TANGERINE) {
        // EIP-150: Gas cost changes for IO-heavy operations
        700
    } else {
        40
    };

    // Transfer value cost.
    if transfers_value {
        gas += CALLVALUE;
    }

    // New account cost.
    if new_account_accounting {
        // EIP-161: State trie clearing (invariant-preserving alternative)
        if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            // Account only if there is value transferred.
            if transfers_value {
                gas += NEWACCOUNT;
            }
        } else {
            gas += NEWACCOUNT;
        }
    }

    gas
}

/// Initial gas that is deducted for a transaction to be included.
///
/// Contains the base stipend, gas for the access list and the input data.
pub fn initial_tx_gas(
    spec_id: SpecId,
    input: &[u8],
    is_create: bool,
    access_list: &[AccessListItem],
) -> u64 {
    let mut initial_gas = 0;
    let zero_data_len = input.iter().filter(|v| **v == 0).count() as u64;
    let non_zero_data_len = input.len() as u64 - zero_data_len;

    // Input data stipend.
    initial_gas += zero_data_len * TRANSACTION_ZERO_DATA;
    // EIP-2028: Transaction data gas cost reduction
    initial_gas += non_zero_data_len
        * if spec_id.is_enabled_in(SpecId::ISTANBUL) {
            TRANSACTION_NON_ZERO_DATA_ISTANBUL
        } else {
            TRANSACTION_NON_ZERO_DATA
        };

    // Access list surcharges.
    if spec_id.is_enabled_in(SpecId::BERLIN) {
        let accessed_slots = access_list
            .iter()
            .fold(0, |slots, item| slots + item.storage_keys.len() as u64);
        initial_gas += access_list.len() as u64 * ACCESS_LIST_ADDRESS;
        initial_gas += accessed_slots * ACCESS_LIST_STORAGE_KEY;
    }

    // Base stipend.
    initial_gas += if is_create {
        if spec_id.is_enabled_in(SpecId::HOMESTEAD) {
            // EIP-2: Homestead hard-fork changes
            TRANSACTION_BASE + CREATE
        } else {
            TRANSACTION_BASE
        }
    } else {
        TRANSACTION_BASE
    };

    // EIP-3860: Limit and meter initcode
    if spec_id.is_enabled_in(SpecId::SHANGHAI) && is_create {
        initial_gas += initcode_cost(input.len() as u64)
    }

    initial_gas
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::Address;

    #[test]
    fn memory_gas_formula() {
        assert_eq!(memory_gas(0), 0);
        assert_eq!(memory_gas(1), 3);
        assert_eq!(memory_gas(32), 3 * 32 + 2);
        assert_eq!(memory_gas(512), 3 * 512 + 512);
    }

    #[test]
    fn memory_gas_is_monotone() {
        let mut prev = 0;
        for words in 0..4096 {
            let cost = memory_gas(words);
            assert!(cost >= prev);
            prev = cost;
        }
    }

    #[test]
    fn keccak_and_log_costs() {
        assert_eq!(keccak256_cost(0), Some(30));
        assert_eq!(keccak256_cost(32), Some(36));
        assert_eq!(keccak256_cost(33), Some(42));
        assert_eq!(log_cost(0, 0), Some(375));
        assert_eq!(log_cost(2, 10), Some(375 + 80 + 750));
    }

    #[test]
    fn exp_cost_per_byte() {
        assert_eq!(exp_cost(SpecId::CANCUN, U256::ZERO), Some(10));
        assert_eq!(exp_cost(SpecId::CANCUN, U256::from(255)), Some(10 + 50));
        assert_eq!(exp_cost(SpecId::CANCUN, U256::from(256)), Some(10 + 100));
        // Pre EIP-160 byte price is 10.
        assert_eq!(exp_cost(SpecId::HOMESTEAD, U256::from(256)), Some(10 + 20));
    }

    #[test]
    fn sload_cost_by_fork() {
        assert_eq!(sload_cost(SpecId::FRONTIER, true), 50);
        assert_eq!(sload_cost(SpecId::TANGERINE, true), 200);
        assert_eq!(sload_cost(SpecId::ISTANBUL, true), 800);
        assert_eq!(sload_cost(SpecId::BERLIN, true), 2100);
        assert_eq!(sload_cost(SpecId::BERLIN, false), 100);
    }

    #[test]
    fn sstore_istanbul_stipend_rule() {
        assert_eq!(
            sstore_cost(
                SpecId::ISTANBUL,
                U256::ZERO,
                U256::ZERO,
                U256::from(1),
                CALL_STIPEND,
                false
            ),
            None
        );
        assert!(sstore_cost(
            SpecId::ISTANBUL,
            U256::ZERO,
            U256::ZERO,
            U256::from(1),
            CALL_STIPEND + 1,
            false
        )
        .is_some());
    }

    #[test]
    fn sstore_berlin_cost_matrix() {
        let zero = U256::ZERO;
        let one = U256::from(1);
        let two = U256::from(2);
        let gas = 1_000_000;

        // new == current: warm read cost.
        assert_eq!(
            sstore_cost(SpecId::BERLIN, zero, one, one, gas, false),
            Some(WARM_STORAGE_READ_COST)
        );
        // fresh slot set.
        assert_eq!(
            sstore_cost(SpecId::BERLIN, zero, zero, one, gas, false),
            Some(SSTORE_SET)
        );
        // reset of an existing slot.
        assert_eq!(
            sstore_cost(SpecId::BERLIN, one, one, two, gas, false),
            Some(WARM_SSTORE_RESET)
        );
        // dirty slot write.
        assert_eq!(
            sstore_cost(SpecId::BERLIN, zero, one, two, gas, false),
            Some(WARM_STORAGE_READ_COST)
        );
        // cold surcharge.
        assert_eq!(
            sstore_cost(SpecId::BERLIN, one, one, two, gas, true),
            Some(WARM_SSTORE_RESET + COLD_SLOAD_COST)
        );
    }

    #[test]
    fn sstore_refund_clears_slot() {
        let zero = U256::ZERO;
        let one = U256::from(1);
        // London schedule.
        assert_eq!(
            sstore_refund(SpecId::LONDON, one, one, zero),
            (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64
        );
        // Istanbul schedule.
        assert_eq!(
            sstore_refund(SpecId::ISTANBUL, one, one, zero),
            REFUND_SSTORE_CLEARS
        );
        // Pre Istanbul.
        assert_eq!(
            sstore_refund(SpecId::BYZANTIUM, one, one, zero),
            REFUND_SSTORE_CLEARS
        );
        assert_eq!(sstore_refund(SpecId::LONDON, one, one, one), 0);
    }

    #[test]
    fn call_cost_by_fork() {
        assert_eq!(call_cost(SpecId::FRONTIER, false, true, false), 40);
        assert_eq!(call_cost(SpecId::TANGERINE, false, true, false), 700);
        assert_eq!(call_cost(SpecId::BERLIN, false, true, false), 2600);
        assert_eq!(call_cost(SpecId::BERLIN, false, false, false), 100);
        // Value transfer surcharge.
        assert_eq!(call_cost(SpecId::BERLIN, true, false, false), 9100);
        // New account: Spurious Dragon only charges when value is transferred.
        assert_eq!(call_cost(SpecId::BERLIN, false, false, true), 100);
        assert_eq!(call_cost(SpecId::BERLIN, true, false, true), 34100);
        assert_eq!(call_cost(SpecId::HOMESTEAD, false, false, true), 25040);
    }

    #[test]
    fn intrinsic_gas_base() {
        assert_eq!(initial_tx_gas(SpecId::CANCUN, &[], false, &[]), 21000);
        // 2 zero bytes + 1 non-zero byte.
        assert_eq!(
            initial_tx_gas(SpecId::CANCUN, &[0, 0, 1], false, &[]),
            21000 + 2 * 4 + 16
        );
        assert_eq!(
            initial_tx_gas(SpecId::HOMESTEAD, &[0, 0, 1], false, &[]),
            21000 + 2 * 4 + 68
        );
    }

    #[test]
    fn intrinsic_gas_create() {
        // Create stipend plus Shanghai initcode words.
        assert_eq!(
            initial_tx_gas(SpecId::CANCUN, &[1; 33], true, &[]),
            21000 + 32000 + 33 * 16 + 2 * 2
        );
        // Frontier did not charge the create stipend.
        assert_eq!(initial_tx_gas(SpecId::FRONTIER, &[], true, &[]), 21000);
    }

    #[test]
    fn intrinsic_gas_access_list() {
        let access_list = [AccessListItem {
            address: Address::ZERO,
            storage_keys: vec![U256::ZERO, U256::from(1)],
        }];
        assert_eq!(
            initial_tx_gas(SpecId::BERLIN, &[], false, &access_list),
            21000 + 2400 + 2 * 1900
        );
        // Ignored before Berlin; validation rejects it earlier.
        assert_eq!(
            initial_tx_gas(SpecId::ISTANBUL, &[], false, &access_list),
            21000
        );
    }
}
