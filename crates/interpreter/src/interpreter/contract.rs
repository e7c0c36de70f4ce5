use crate::CallContext;
use primitives::{Address, Bytecode, Bytes, Env, TxKind, B256, U256};

/// Contract information of an execution frame.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contract {
    /// Call data of the frame.
    pub input: Bytes,
    /// Bytecode, analyzed with a jump table. The executed buffer is the
    /// padded form, ending in a STOP.
    pub bytecode: Bytecode,
    /// Hash of the original bytecode.
    pub hash: B256,
    /// Target address of the frame. Storage of this address is modified.
    pub address: Address,
    /// Caller of the frame.
    pub caller: Address,
    /// Value sent to the contract from the transaction or from CALL opcodes.
    pub value: U256,
}

impl Contract {
    /// Instantiates a new contract, analyzing the given bytecode.
    #[inline]
    pub fn new(
        input: Bytes,
        bytecode: Bytecode,
        hash: B256,
        address: Address,
        caller: Address,
        value: U256,
    ) -> Self {
        Self {
            input,
            bytecode: bytecode.into_analyzed(),
            hash,
            address,
            caller,
            value,
        }
    }

    /// Creates a new contract from the given environment; used for the
    /// top-level frame of a transaction.
    #[inline]
    pub fn new_env(env: &Env, bytecode: Bytecode, hash: B256) -> Self {
        let address = match env.tx.transact_to {
            TxKind::Call(caller) => caller,
            TxKind::Create => Address::ZERO,
        };
        Self::new(
            env.tx.data.clone(),
            bytecode,
            hash,
            address,
            env.tx.caller,
            env.tx.value,
        )
    }

    /// Creates a new contract from the given call inputs.
    #[inline]
    pub fn new_with_context(
        input: Bytes,
        bytecode: Bytecode,
        hash: B256,
        context: &CallContext,
    ) -> Self {
        Self::new(
            input,
            bytecode,
            hash,
            context.address,
            context.caller,
            context.apparent_value,
        )
    }

    /// Returns whether the given position is a valid jump destination.
    #[inline]
    pub fn is_valid_jump(&self, pos: usize) -> bool {
        match &self.bytecode {
            Bytecode::Analyzed(analyzed) => analyzed.is_valid_jump(pos),
            Bytecode::Raw(_) => false,
        }
    }
}
