//! End-to-end transaction tests against an in-memory database.

use sevm::{
    db::InMemoryDB,
    primitives::{
        keccak256, AccountInfo, Address, Bytecode, Bytes, EVMError, Env, ExecutionResult,
        HaltReason, InvalidTransaction, Output, SuccessReason, TxKind, B256, KECCAK_EMPTY, U256,
    },
    Evm,
};

const CALLER: Address = Address::new([0x11; 20]);
const CONTRACT: Address = Address::new([0x22; 20]);
const OTHER: Address = Address::new([0x33; 20]);

fn contract_db(code: &[u8]) -> InMemoryDB {
    let mut db = InMemoryDB::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(1_000_000_000)));
    db.insert_account_info(
        CONTRACT,
        AccountInfo::new(
            U256::ZERO,
            1,
            Bytecode::new_raw(Bytes::copy_from_slice(code)),
        ),
    );
    db
}

fn call_env(to: Address, gas_limit: u64) -> Box<Env> {
    let mut env = Env::default();
    env.tx.caller = CALLER;
    env.tx.transact_to = TxKind::Call(to);
    env.tx.gas_limit = gas_limit;
    Box::new(env)
}

fn transact_call(code: &[u8], gas_limit: u64) -> ExecutionResult {
    let mut evm = Evm::new(contract_db(code), call_env(CONTRACT, gas_limit));
    evm.transact().expect("transaction should not fail").result
}

#[test]
fn simple_arithmetic_consumes_nine_gas() {
    // PUSH1 1, PUSH1 2, ADD
    let result = transact_call(&[0x60, 0x01, 0x60, 0x02, 0x01], 100_000);
    let ExecutionResult::Success {
        reason, gas_used, ..
    } = result
    else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(reason, SuccessReason::Stop);
    assert_eq!(gas_used, 21_000 + 9);
}

#[test]
fn invalid_jump_halts_with_all_gas() {
    // PUSH1 3, JUMP, REVERT, JUMPDEST, PUSH1 1 -- target 3 is not a JUMPDEST
    let result = transact_call(&[0x60, 0x03, 0x56, 0xFD, 0x5B, 0x60, 0x01], 100_000);
    assert_eq!(
        result,
        ExecutionResult::Halt {
            reason: HaltReason::InvalidJump,
            gas_used: 100_000,
        }
    );
}

#[test]
fn valid_jump_executes_to_completion() {
    // PUSH1 4, JUMP, REVERT, JUMPDEST, PUSH1 1
    let result = transact_call(&[0x60, 0x04, 0x56, 0xFD, 0x5B, 0x60, 0x01], 100_000);
    let ExecutionResult::Success {
        reason, gas_used, ..
    } = result
    else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(reason, SuccessReason::Stop);
    assert_eq!(gas_used, 21_000 + 15);
}

#[test]
fn create_transaction_deploys_code() {
    // Init code: CODECOPY the single trailing byte (a STOP) and RETURN it as
    // the runtime.
    let init_code: &[u8] = &[
        0x60, 0x01, // PUSH1 1   (len)
        0x60, 0x0C, // PUSH1 12  (code offset of the runtime)
        0x60, 0x00, // PUSH1 0   (memory dest)
        0x39, // CODECOPY
        0x60, 0x01, // PUSH1 1
        0x60, 0x00, // PUSH1 0
        0xF3, // RETURN
        0x00, // the runtime: STOP
    ];

    let mut db = InMemoryDB::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(1_000_000_000)));

    let mut env = Env::default();
    env.tx.caller = CALLER;
    env.tx.transact_to = TxKind::Create;
    env.tx.data = Bytes::copy_from_slice(init_code);
    env.tx.gas_limit = 1_000_000;

    let mut evm = Evm::new(db, Box::new(env));
    let outcome = evm.transact().unwrap();

    let ExecutionResult::Success {
        reason,
        output: Output::Create(runtime, Some(address)),
        ..
    } = outcome.result
    else {
        panic!("expected create success, got {:?}", outcome.result);
    };
    assert_eq!(reason, SuccessReason::Return);
    assert_eq!(runtime, Bytes::from_static(&[0x00]));

    // The address is derived from the caller and its pre-transaction nonce.
    assert_eq!(address, CALLER.create(0));

    // The deployed code landed in the state.
    let created = outcome.state.get(&address).expect("created account");
    assert!(created.is_created());
    assert_eq!(
        created.info.code_hash,
        keccak256([0x00]),
    );
    // Sender nonce: one for the transaction, one for the create.
    assert_eq!(outcome.state.get(&CALLER).unwrap().info.nonce, 1);
}

#[test]
fn create2_opcode_derives_salted_address() {
    // PUSH1 0 (salt), PUSH1 0 (len), PUSH1 0 (offset), PUSH1 0 (value),
    // CREATE2 -- deploys an empty contract at the salted address.
    let result_state = {
        let code = &[0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0xF5];
        let mut evm = Evm::new(contract_db(code), call_env(CONTRACT, 1_000_000));
        evm.transact().unwrap()
    };
    assert!(result_state.result.is_success());

    let expected = CONTRACT.create2(B256::ZERO, KECCAK_EMPTY);
    let created = result_state
        .state
        .get(&expected)
        .expect("create2 account at the derived address");
    assert!(created.is_created());
}

#[test]
fn intrinsic_gas_floor_rejects_before_execution() {
    let mut evm = Evm::new(contract_db(&[0x00]), call_env(CONTRACT, 21_000 - 1));
    let err = evm.transact().unwrap_err();
    assert_eq!(
        err,
        EVMError::Transaction(InvalidTransaction::CallGasCostMoreThanGasLimit)
    );
}

#[test]
fn sstore_in_static_call_fails_subframe() {
    // The callee attempts an SSTORE.
    let callee_code: &[u8] = &[0x60, 0x01, 0x60, 0x00, 0x55];

    // The caller STATICCALLs the callee and returns the success flag word.
    let mut caller_code = vec![
        0x60, 0x00, // out len
        0x60, 0x00, // out offset
        0x60, 0x00, // in len
        0x60, 0x00, // in offset
        0x73, // PUSH20 callee
    ];
    caller_code.extend_from_slice(OTHER.as_slice());
    caller_code.extend_from_slice(&[
        0x61, 0xFF, 0xFF, // PUSH2 gas
        0xFA, // STATICCALL
        0x60, 0x00, // PUSH1 0
        0x52, // MSTORE
        0x60, 0x20, // PUSH1 32
        0x60, 0x00, // PUSH1 0
        0xF3, // RETURN
    ]);

    let mut db = contract_db(&caller_code);
    db.insert_account_info(
        OTHER,
        AccountInfo::new(
            U256::ZERO,
            1,
            Bytecode::new_raw(Bytes::copy_from_slice(callee_code)),
        ),
    );

    let mut evm = Evm::new(db, call_env(CONTRACT, 1_000_000));
    let outcome = evm.transact().unwrap();

    // The parent succeeds and reports the failure flag 0 of the subframe.
    let ExecutionResult::Success { output, .. } = outcome.result else {
        panic!("expected success, got {:?}", outcome.result);
    };
    assert_eq!(output.into_data(), Bytes::from_static(&[0u8; 32]));
    // The callee's storage is untouched.
    assert!(outcome
        .state
        .get(&OTHER)
        .map_or(true, |account| account.storage.values().all(|slot| slot
            .present_value
            .is_zero())));
}

#[test]
fn value_transfer_to_eoa() {
    let mut db = InMemoryDB::default();
    db.insert_account_info(CALLER, AccountInfo::from_balance(U256::from(1_000)));

    let mut env = call_env(OTHER, 50_000);
    env.tx.value = U256::from(77);
    let mut evm = Evm::new(db, env);
    let outcome = evm.transact().unwrap();

    // An EOA call still consumes the intrinsic gas and succeeds empty.
    let ExecutionResult::Success {
        reason,
        gas_used,
        output,
        ..
    } = outcome.result
    else {
        panic!("expected success, got {:?}", outcome.result);
    };
    assert_eq!(reason, SuccessReason::Stop);
    assert_eq!(gas_used, 21_000);
    assert!(output.into_data().is_empty());

    assert_eq!(
        outcome.state.get(&OTHER).unwrap().info.balance,
        U256::from(77)
    );
    assert_eq!(
        outcome.state.get(&CALLER).unwrap().info.balance,
        U256::from(1_000 - 77)
    );
}

#[test]
fn sstore_clear_earns_capped_refund() {
    // PUSH1 0, PUSH1 0, SSTORE: clears slot 0 which holds 1.
    let mut db = contract_db(&[0x60, 0x00, 0x60, 0x00, 0x55]);
    db.insert_account_storage(CONTRACT, U256::ZERO, U256::from(1));

    let mut evm = Evm::new(db, call_env(CONTRACT, 100_000));
    let outcome = evm.transact().unwrap();

    let ExecutionResult::Success {
        gas_used,
        gas_refunded,
        ..
    } = outcome.result
    else {
        panic!("expected success, got {:?}", outcome.result);
    };
    // 3 + 3 for the pushes, 2900 + 2100 for the cold sstore reset.
    let spent = 21_000 + 3 + 3 + 2900 + 2100;
    // EIP-3529 London refund for clearing a slot.
    assert_eq!(gas_refunded, 4_800);
    assert_eq!(gas_used, spent - 4_800);
}

#[test]
fn revert_returns_output_and_remaining_gas() {
    // MSTORE8 0x2A at 0, REVERT with 1 byte of output.
    let result = transact_call(
        &[0x60, 0x2A, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xFD],
        100_000,
    );
    let ExecutionResult::Revert { gas_used, output } = result else {
        panic!("expected revert, got {result:?}");
    };
    assert_eq!(output, Bytes::from_static(&[0x2A]));
    // 3 + 3 + 3 (mstore8) + 3 + 3 + memory expansion of one word.
    assert_eq!(gas_used, 21_000 + 15 + 3);
}

#[test]
fn nonce_mismatch_is_rejected() {
    let mut env = call_env(CONTRACT, 100_000);
    env.tx.nonce = Some(7);
    let mut evm = Evm::new(contract_db(&[0x00]), env);
    assert_eq!(
        evm.transact().unwrap_err(),
        EVMError::Transaction(InvalidTransaction::NonceTooHigh { tx: 7, state: 0 })
    );
}

#[test]
fn identity_precompile_via_call() {
    // CALL the identity precompile (0x04) with 4 bytes of calldata-independent
    // memory input, then return the copied word.
    let code: &[u8] = &[
        0x60, 0x2A, // PUSH1 0x2A
        0x60, 0x00, // PUSH1 0
        0x52, // MSTORE (word at 0)
        0x60, 0x20, // out len 32
        0x60, 0x20, // out offset 32
        0x60, 0x20, // in len 32
        0x60, 0x00, // in offset 0
        0x60, 0x00, // value 0
        0x60, 0x04, // PUSH1 4 (identity precompile)
        0x61, 0xFF, 0xFF, // gas
        0xF1, // CALL
        0x50, // POP the success flag
        0x60, 0x20, // PUSH1 32
        0x60, 0x20, // PUSH1 32
        0xF3, // RETURN output window
    ];
    let result = transact_call(code, 1_000_000);
    let ExecutionResult::Success { output, .. } = result else {
        panic!("expected success, got {result:?}");
    };
    let mut expected = [0u8; 32];
    expected[31] = 0x2A;
    assert_eq!(output.into_data(), Bytes::copy_from_slice(&expected));
}

#[test]
fn call_forwards_and_returns_gas() {
    // Callee immediately stops; most forwarded gas returns to the caller.
    let mut db = contract_db(&{
        let mut code = vec![
            0x60, 0x00, // out len
            0x60, 0x00, // out offset
            0x60, 0x00, // in len
            0x60, 0x00, // in offset
            0x60, 0x00, // value
            0x73, // PUSH20 callee
        ];
        code.extend_from_slice(OTHER.as_slice());
        code.extend_from_slice(&[0x62, 0xFF, 0xFF, 0xFF, 0xF1]); // PUSH3 gas, CALL
        code
    });
    db.insert_account_info(
        OTHER,
        AccountInfo::new(U256::ZERO, 1, Bytecode::new_raw(Bytes::from_static(&[0x00]))),
    );

    let mut evm = Evm::new(db, call_env(CONTRACT, 100_000));
    let outcome = evm.transact().unwrap();
    let gas_used = outcome.result.gas_used();
    // 6 pushes, a warm-ish cold account access and the call; far less than
    // the forwarded amount.
    assert!(outcome.result.is_success());
    assert!(gas_used < 25_000, "unused forwarded gas must return, used {gas_used}");
}
