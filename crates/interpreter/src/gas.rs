//! EVM gas calculation utilities.

mod calc;
mod constants;

pub use calc::*;
pub use constants::*;

/// Represents the state of gas during execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gas {
    /// The initial gas limit. This is constant throughout execution.
    limit: u64,
    /// The amount of gas spent.
    used: u64,
    /// Refunded gas. This is used only at the end of execution.
    refunded: i64,
    /// Memoisation of values for memory expansion cost.
    memory: MemoryGas,
}

impl Gas {
    /// Creates a new `Gas` struct with the given gas limit.
    #[inline]
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            used: 0,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// Creates a new `Gas` struct with the given gas limit, but without any
    /// gas remaining.
    #[inline]
    pub const fn new_spent(limit: u64) -> Self {
        Self {
            limit,
            used: limit,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// Returns the gas limit.
    #[inline]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the total amount of gas that was refunded.
    #[inline]
    pub const fn refunded(&self) -> i64 {
        self.refunded
    }

    /// Returns the total amount of gas spent.
    #[inline]
    pub const fn spent(&self) -> u64 {
        self.used
    }

    /// Returns the amount of gas remaining.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.limit - self.used
    }

    /// Returns the remaining gas after subtracting the 1/64th part,
    /// per the EIP-150 forwarding rule.
    #[inline]
    pub const fn remaining_63_of_64_parts(&self) -> u64 {
        self.remaining() - self.remaining() / 64
    }

    /// Erases a gas cost from the totals, returning gas from a child frame.
    #[inline]
    pub fn erase_cost(&mut self, returned: u64) {
        self.used -= returned;
    }

    /// Spends all remaining gas.
    #[inline]
    pub fn spend_all(&mut self) {
        self.used = self.limit;
    }

    /// Records a refund value.
    ///
    /// `refund` can be negative but `self.refunded` should always be positive
    /// at the end of transact.
    #[inline]
    pub fn record_refund(&mut self, refund: i64) {
        self.refunded += refund;
    }

    /// Set a refund value for the final refund.
    ///
    /// The max refund value is limited to the Nth part (depending on fork) of
    /// the gas spent.
    ///
    /// Related to EIP-3529: Reduction in refunds.
    #[inline]
    pub fn set_final_refund(&mut self, is_london: bool) {
        let max_refund_quotient = if is_london { 5 } else { 2 };
        self.refunded = (self.refunded() as u64).min(self.spent() / max_refund_quotient) as i64;
    }

    /// Sets a refund value, overriding the accumulated one.
    #[inline]
    pub fn set_refund(&mut self, refund: i64) {
        self.refunded = refund;
    }

    /// Records an explicit cost.
    ///
    /// Returns `false` if the gas limit is exceeded (or the addition to the
    /// spent counter would wrap).
    #[inline]
    #[must_use = "prefer using `gas!` instead to return an out-of-gas error on failure"]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        let Some(new_used) = self.used.checked_add(cost) else {
            return false;
        };
        if new_used > self.limit {
            return false;
        }
        self.used = new_used;
        true
    }

    /// Records a memory expansion to `new_words` context words.
    ///
    /// Charges the incremental expansion cost against the remaining gas.
    #[inline]
    #[must_use = "internally uses record_cost that flags out of gas error"]
    pub fn record_memory_expansion(&mut self, new_words: usize) -> MemoryExtensionResult {
        let Some(additional_cost) = self.memory.record_new_words(new_words) else {
            return MemoryExtensionResult::Same;
        };

        if !self.record_cost(additional_cost) {
            return MemoryExtensionResult::OutOfGas;
        }

        MemoryExtensionResult::Extended
    }
}

/// Outcome of a memory expansion charge.
pub enum MemoryExtensionResult {
    /// Memory was extended.
    Extended,
    /// Memory size stayed the same.
    Same,
    /// Not enough gas to extend memory.
    OutOfGas,
}

/// Utility struct that speeds up calculation of memory expansion cost.
///
/// It contains the current memory length in words and its expansion cost,
/// which allows gas accounting to be split from the memory structure.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryGas {
    /// Current number of memory words.
    pub words_num: usize,
    /// Current memory expansion cost.
    pub expansion_cost: u64,
}

impl MemoryGas {
    pub const fn new() -> Self {
        Self {
            words_num: 0,
            expansion_cost: 0,
        }
    }

    /// Records the new word count, returning the incremental cost if the
    /// memory grew.
    #[inline]
    pub fn record_new_words(&mut self, new_num: usize) -> Option<u64> {
        if new_num <= self.words_num {
            return None;
        }
        self.words_num = new_num;
        let mut cost = crate::gas::calc::memory_gas(new_num);
        core::mem::swap(&mut self.expansion_cost, &mut cost);
        // Safe to subtract because expansion cost is monotone in words.
        Some(self.expansion_cost - cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_cost_against_limit() {
        let mut gas = Gas::new(100);
        assert!(gas.record_cost(60));
        assert_eq!(gas.spent(), 60);
        assert_eq!(gas.remaining(), 40);
        assert!(!gas.record_cost(41));
        // failed record leaves the counters untouched
        assert_eq!(gas.spent(), 60);
        assert!(gas.record_cost(40));
        assert_eq!(gas.remaining(), 0);
    }

    #[test]
    fn record_cost_wrapping_is_rejected() {
        let mut gas = Gas::new(u64::MAX);
        assert!(gas.record_cost(1));
        assert!(!gas.record_cost(u64::MAX));
    }

    #[test]
    fn erase_cost_returns_gas() {
        let mut gas = Gas::new(100);
        assert!(gas.record_cost(80));
        gas.erase_cost(30);
        assert_eq!(gas.spent(), 50);
    }

    #[test]
    fn final_refund_is_capped() {
        let mut gas = Gas::new(100);
        assert!(gas.record_cost(100));
        gas.record_refund(1_000);
        gas.set_final_refund(true);
        assert_eq!(gas.refunded(), 20); // spent / 5
        gas.record_refund(980);
        gas.set_final_refund(false);
        assert_eq!(gas.refunded(), 50); // spent / 2
    }

    #[test]
    fn memory_expansion_is_incremental() {
        let mut gas = Gas::new(1_000_000);
        assert!(matches!(
            gas.record_memory_expansion(1),
            MemoryExtensionResult::Extended
        ));
        let after_one = gas.spent();
        assert_eq!(after_one, 3);
        assert!(matches!(
            gas.record_memory_expansion(1),
            MemoryExtensionResult::Same
        ));
        assert!(matches!(
            gas.record_memory_expansion(32),
            MemoryExtensionResult::Extended
        ));
        // 3 * 32 + 32 * 32 / 512 = 98, minus the 3 already charged.
        assert_eq!(gas.spent(), 98);
    }
}
