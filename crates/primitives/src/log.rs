use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, B256};

/// A log emitted by the LOG0..LOG4 opcodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
    /// Address of the contract that emitted the log.
    pub address: Address,
    /// Log topics, at most four.
    pub topics: Vec<B256>,
    /// Arbitrary data attached to the log.
    pub data: Bytes,
}
