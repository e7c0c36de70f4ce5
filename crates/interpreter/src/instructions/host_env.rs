use crate::{gas, Host, Interpreter};
use primitives::{SpecId, U256};

/// EIP-1344: ChainID opcode
pub fn chainid<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, ISTANBUL);
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(host.env().cfg.chain_id));
}

pub fn coinbase<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push_b256!(interpreter, host.env().block.coinbase.into_word());
}

pub fn timestamp<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.timestamp);
}

pub fn block_number<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.number);
}

/// DIFFICULTY before the merge; PREVRANDAO after (EIP-4399).
pub fn difficulty<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    if interpreter.spec_enabled(SpecId::MERGE) {
        // Validated in the block env; always set post merge.
        let prevrandao = host.env().block.prevrandao.unwrap_or_default();
        push_b256!(interpreter, prevrandao);
    } else {
        push!(interpreter, host.env().block.difficulty);
    }
}

pub fn gaslimit<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.gas_limit);
}

pub fn gasprice<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().effective_gas_price());
}

pub fn origin<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push_b256!(interpreter, host.env().tx.caller.into_word());
}

/// EIP-3198: BASEFEE opcode
pub fn basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, LONDON);
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.basefee);
}

/// EIP-4844: Shard Blob Transactions
pub fn blob_hash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CANCUN);
    gas!(interpreter, gas::VERYLOW);
    pop_top!(interpreter, index_ptr);
    let index = as_usize_saturated!(index_ptr);
    *index_ptr = match host.env().tx.blob_hashes.get(index) {
        Some(hash) => U256::from_be_bytes(hash.0),
        None => U256::ZERO,
    };
}

/// EIP-7516: BLOBBASEFEE opcode
pub fn blob_basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, CANCUN);
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        U256::from(host.env().block.get_blob_gasprice().unwrap_or_default())
    );
}

#[cfg(test)]
mod tests {
    use super::super::tests::run_expect_stack;
    use bytecode::opcode;
    use primitives::U256;

    #[test]
    fn chainid_defaults_to_mainnet() {
        run_expect_stack(&[opcode::CHAINID], U256::from(1));
    }

    #[test]
    fn blobhash_out_of_range_is_zero() {
        run_expect_stack(&[opcode::PUSH1, 0x00, opcode::BLOBHASH], U256::ZERO);
    }
}
