pub const ZERO: u64 = 0;
pub const BASE: u64 = 2;

pub const VERYLOW: u64 = 3;
pub const LOW: u64 = 5;
pub const MID: u64 = 8;
pub const HIGH: u64 = 10;

pub const JUMPDEST: u64 = 1;
/// Refund given by SELFDESTRUCT before EIP-3529 removed it.
pub const SELFDESTRUCT: i64 = 24000;
pub const CREATE: u64 = 32000;
/// Additional gas cost when a call transfers value.
pub const CALLVALUE: u64 = 9000;
/// Gas cost for creating a new account.
pub const NEWACCOUNT: u64 = 25000;
/// Base gas cost for the EXP instruction.
pub const EXP: u64 = 10;
/// Gas cost per word for memory expansion.
pub const MEMORY: u64 = 3;
/// Base gas cost for LOG instructions.
pub const LOG: u64 = 375;
/// Gas cost per byte of data in LOG instructions.
pub const LOGDATA: u64 = 8;
/// Gas cost per topic in LOG instructions.
pub const LOGTOPIC: u64 = 375;
/// Base gas cost for the KECCAK256 instruction.
pub const KECCAK256: u64 = 30;
/// Gas cost per word for the KECCAK256 instruction.
pub const KECCAK256WORD: u64 = 6;
/// Gas cost per word for copy operations.
pub const COPY: u64 = 3;
pub const BLOCKHASH: u64 = 20;
/// Gas cost per byte for code deposit during contract creation.
pub const CODEDEPOSIT: u64 = 200;

/// Base transaction stipend.
pub const TRANSACTION_BASE: u64 = 21000;
/// Gas cost per zero byte of transaction input data.
pub const TRANSACTION_ZERO_DATA: u64 = 4;
/// Gas cost per non-zero byte of transaction input data before Istanbul.
pub const TRANSACTION_NON_ZERO_DATA: u64 = 68;
/// Gas cost per non-zero byte of transaction input data from Istanbul
/// (EIP-2028: Transaction data gas cost reduction).
pub const TRANSACTION_NON_ZERO_DATA_ISTANBUL: u64 = 16;

/// EIP-1884: Repricing for trie-size-dependent opcodes.
pub const ISTANBUL_SLOAD_GAS: u64 = 800;
/// Gas cost for SSTORE when setting a storage slot from zero to non-zero.
pub const SSTORE_SET: u64 = 20000;
/// Gas cost for SSTORE when modifying an existing non-zero storage slot.
pub const SSTORE_RESET: u64 = 5000;
/// Gas refund for SSTORE when clearing a storage slot, before EIP-3529.
pub const REFUND_SSTORE_CLEARS: i64 = 15000;

// Berlin EIP-2929 constants.
/// Gas cost for an address in the transaction access list (EIP-2929).
pub const ACCESS_LIST_ADDRESS: u64 = 2400;
/// Gas cost for a storage key in the transaction access list (EIP-2929).
pub const ACCESS_LIST_STORAGE_KEY: u64 = 1900;
/// Gas cost for SLOAD on a cold storage slot (EIP-2929).
pub const COLD_SLOAD_COST: u64 = 2100;
/// Gas cost for accessing a cold account (EIP-2929).
pub const COLD_ACCOUNT_ACCESS_COST: u64 = 2600;
/// Gas cost for reading a warm storage slot (EIP-2929).
pub const WARM_STORAGE_READ_COST: u64 = 100;
/// Gas cost for the SSTORE reset operation on a warm storage slot.
pub const WARM_SSTORE_RESET: u64 = SSTORE_RESET - COLD_SLOAD_COST;

/// EIP-3860: Limit and meter initcode.
pub const INITCODE_WORD_COST: u64 = 2;

/// Gas stipend provided to the recipient of a CALL with value transfer.
pub const CALL_STIPEND: u64 = 2300;
