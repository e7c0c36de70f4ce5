pub use primitives::CreateScheme;
use primitives::{Address, Bytes, U256};

/// Inputs for a call frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallInputs {
    /// The account whose bytecode is executed.
    pub contract: Address,
    /// The transfer, if any, in this call.
    pub transfer: Transfer,
    /// The call data of the call.
    pub input: Bytes,
    /// The gas limit of the call.
    pub gas_limit: u64,
    /// The context of the call.
    pub context: CallContext,
    /// Whether this is a static call.
    pub is_static: bool,
    /// The return memory window `(offset, len)` that the caller reserved for
    /// the output.
    pub return_memory_offset: (usize, usize),
}

/// Inputs for a create frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateInputs {
    /// Caller of the create.
    pub caller: Address,
    /// CREATE or CREATE2 scheme.
    pub scheme: CreateScheme,
    /// Value transferred into the created account.
    pub value: U256,
    /// Init code of the contract.
    pub init_code: Bytes,
    /// The gas limit of the create frame.
    pub gas_limit: u64,
}

/// Call schemes.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallScheme {
    /// `CALL`.
    Call,
    /// `CALLCODE`.
    CallCode,
    /// `DELEGATECALL`.
    DelegateCall,
    /// `STATICCALL`.
    StaticCall,
}

/// Context of a call frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallContext {
    /// Execution address; storage of this address is modified.
    pub address: Address,
    /// Caller address of the frame.
    pub caller: Address,
    /// The address the contract code was loaded from.
    pub code_address: Address,
    /// Apparent value of the frame, as reported by `CALLVALUE`.
    pub apparent_value: U256,
    /// The scheme used for the call.
    pub scheme: CallScheme,
}

impl Default for CallContext {
    fn default() -> Self {
        CallContext {
            address: Address::ZERO,
            caller: Address::ZERO,
            code_address: Address::ZERO,
            apparent_value: U256::ZERO,
            scheme: CallScheme::Call,
        }
    }
}

/// Transfer from source to target of the given value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transfer {
    /// The source address.
    pub source: Address,
    /// The target address.
    pub target: Address,
    /// The transfer value.
    pub value: U256,
}

/// Result of an `sstore` reported by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SStoreResult {
    /// Value of the storage slot when it was first read in the transaction.
    pub original_value: U256,
    /// Value of the storage slot before this write.
    pub present_value: U256,
    /// New value that was written.
    pub new_value: U256,
    /// Whether the slot was cold before this access.
    pub is_cold: bool,
}

/// Result of a selfdestruct reported by the host.
///
/// The values are needed to calculate the gas spent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfDestructResult {
    pub had_value: bool,
    pub target_exists: bool,
    pub is_cold: bool,
    pub previously_destroyed: bool,
}
