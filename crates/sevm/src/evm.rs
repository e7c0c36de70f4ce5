use crate::{CallFrame, EvmContext, FrameResult, TransferError};
use alloc::{boxed::Box, vec::Vec};
use interpreter::{
    gas, make_instruction_table, return_ok, return_revert, CallContext, CallInputs, CallScheme,
    Contract, CreateInputs, CreateScheme, Gas, InstructionResult, Interpreter, InterpreterAction,
    InterpreterResult, SuccessOrHalt, Transfer, CALL_STACK_LIMIT,
};
use primitives::{
    keccak256, spec_to_generic, AnalysisKind, Bytecode, Bytes, Database, EVMError, EVMResult, Env,
    ExecutionResult, InvalidTransaction, Output, ResultAndState, SpecId, TransactTo, B256, U256,
};

/// The EVM driver: owns the execution context and the call stack of frames,
/// and orchestrates CALL/CREATE dispatch, gas forwarding and return-data
/// routing.
pub struct Evm<DB: Database> {
    /// The inner context: environment, journaled state, database and
    /// precompiles.
    pub context: EvmContext<DB>,
    /// The call stack. Only the top frame runs at any instant.
    frames: Vec<CallFrame>,
}

/// Either a new frame to push, or a result produced without running a frame
/// (precompile output, depth/balance failure, call to a code-less account).
enum FrameOrResult {
    Frame(CallFrame),
    Result(InterpreterResult),
}

impl<DB: Database> Evm<DB> {
    /// Creates a new EVM with the given database and environment.
    pub fn new(db: DB, env: Box<Env>) -> Self {
        Self {
            context: EvmContext::new(db, env),
            frames: Vec::new(),
        }
    }

    /// Executes the transaction of the environment: pre-flight validation
    /// followed by execution.
    pub fn transact(&mut self) -> EVMResult<DB::Error> {
        self.preverify_transaction()?;
        self.transact_preverified()
    }

    /// Runs the checks that can fail a transaction before any frame opens.
    pub fn preverify_transaction(&mut self) -> Result<(), EVMError<DB::Error>> {
        let spec_id = self.context.spec_id();
        let env = &self.context.env;

        // Important: validate the block before the transaction.
        spec_to_generic!(spec_id, env.validate_block_env::<SPEC>())?;
        spec_to_generic!(spec_id, env.validate_tx::<SPEC>())?;

        let initial_gas_spend = gas::initial_tx_gas(
            spec_id,
            &env.tx.data,
            env.tx.transact_to.is_create(),
            &env.tx.access_list,
        );

        // The limit must at least cover the intrinsic gas.
        if initial_gas_spend > env.tx.gas_limit {
            return Err(InvalidTransaction::CallGasCostMoreThanGasLimit.into());
        }

        let tx_caller = env.tx.caller;
        let (caller_account, _) = self
            .context
            .journaled_state
            .load_account(tx_caller, &mut self.context.db)
            .map_err(EVMError::Database)?;

        self.context
            .env
            .validate_tx_against_state(caller_account)
            .map_err(Into::into)
    }

    /// Executes the (already validated) transaction.
    pub fn transact_preverified(&mut self) -> EVMResult<DB::Error> {
        let spec_id = self.context.spec_id();
        let env = &self.context.env;
        let tx_caller = env.tx.caller;
        let tx_value = env.tx.value;
        let tx_data = env.tx.data.clone();
        let tx_gas_limit = env.tx.gas_limit;
        let is_create = env.tx.transact_to.is_create();
        let effective_gas_price = env.effective_gas_price();

        let initial_gas_spend = gas::initial_tx_gas(
            spec_id,
            &tx_data,
            is_create,
            &env.tx.access_list,
        );

        // EIP-3651: Warm COINBASE
        if spec_id.is_enabled_in(SpecId::SHANGHAI) {
            let coinbase = self.context.env.block.coinbase;
            self.context
                .journaled_state
                .initial_account_load(coinbase, core::iter::empty(), &mut self.context.db)
                .map_err(EVMError::Database)?;
        }

        // EIP-2930: warm the access list.
        self.context.load_access_list()?;

        // Deduct the maximum gas cost from the caller. Saturating so that a
        // disabled balance check cannot underflow.
        let mut gas_cost = U256::from(tx_gas_limit).saturating_mul(effective_gas_price);

        // EIP-4844: the blob fee is charged up front and not refunded.
        if let Some(data_fee) = self.context.env.calc_data_fee() {
            gas_cost = gas_cost.saturating_add(data_fee);
        }

        let (caller_account, _) = self
            .context
            .journaled_state
            .load_account(tx_caller, &mut self.context.db)
            .map_err(EVMError::Database)?;
        caller_account.info.balance = caller_account.info.balance.saturating_sub(gas_cost);
        // Touch the account so we know it changed.
        caller_account.mark_touch();

        let transact_gas_limit = tx_gas_limit - initial_gas_spend;

        let first_frame = match self.context.env.tx.transact_to {
            TransactTo::Call(address) => {
                // Nonce was already checked in preverification.
                let caller_account = self.context.journaled_state.state.get_mut(&tx_caller).unwrap();
                caller_account.info.nonce = caller_account.info.nonce.saturating_add(1);

                self.make_call_frame(&CallInputs {
                    contract: address,
                    transfer: Transfer {
                        source: tx_caller,
                        target: address,
                        value: tx_value,
                    },
                    input: tx_data,
                    gas_limit: transact_gas_limit,
                    context: CallContext {
                        address,
                        caller: tx_caller,
                        code_address: address,
                        apparent_value: tx_value,
                        scheme: CallScheme::Call,
                    },
                    is_static: false,
                    return_memory_offset: (0, 0),
                })?
            }
            TransactTo::Create => {
                // The nonce of the caller is incremented inside the create
                // frame preparation, deriving the address from its old value.
                self.make_create_frame(&CreateInputs {
                    caller: tx_caller,
                    scheme: CreateScheme::Create,
                    value: tx_value,
                    init_code: tx_data,
                    gas_limit: transact_gas_limit,
                })?
            }
        };

        let frame_result = match first_frame {
            FrameOrResult::Frame(frame) => self.run_exec_loop(frame)?,
            FrameOrResult::Result(result) => FrameResult {
                result,
                created_address: None,
            },
        };

        self.post_execution(frame_result, is_create)
    }

    /// The frame-stack execution loop: runs the top frame until it yields an
    /// action, applies the action, and resumes the next active frame.
    fn run_exec_loop(&mut self, first_frame: CallFrame) -> Result<FrameResult, EVMError<DB::Error>> {
        let instruction_table = make_instruction_table::<EvmContext<DB>>();
        self.frames.push(first_frame);

        loop {
            let action = {
                let frame = self.frames.last_mut().unwrap();
                frame.interpreter.run(&instruction_table, &mut self.context)
            };

            match action {
                InterpreterAction::Call { inputs } => match self.make_call_frame(&inputs)? {
                    FrameOrResult::Frame(new_frame) => {
                        let parent = self.frames.last_mut().unwrap();
                        parent.interpreter.memory.new_context();
                        self.frames.push(new_frame);
                    }
                    FrameOrResult::Result(result) => {
                        // No frame was opened, so no memory context to pop.
                        let parent = self.frames.last_mut().unwrap();
                        parent
                            .interpreter
                            .insert_call_outcome(result, inputs.return_memory_offset);
                    }
                },
                InterpreterAction::Create { inputs } => match self.make_create_frame(&inputs)? {
                    FrameOrResult::Frame(new_frame) => self.frames.push(new_frame),
                    FrameOrResult::Result(result) => {
                        let parent = self.frames.last_mut().unwrap();
                        parent.interpreter.insert_create_outcome(result, None);
                    }
                },
                InterpreterAction::Return { result } => {
                    if let Some(frame_result) = self.frame_return(result)? {
                        return Ok(frame_result);
                    }
                }
                InterpreterAction::None => {
                    // A frame flagged a transfer without an action; finalize
                    // it cleanly as a stopped frame.
                    let gas = self.frames.last().unwrap().interpreter.gas;
                    let result = InterpreterResult::new(InstructionResult::Stop, Bytes::new(), gas);
                    if let Some(frame_result) = self.frame_return(result)? {
                        return Ok(frame_result);
                    }
                }
            }
        }
    }

    /// Pops the top frame with its result, settles its checkpoint and routes
    /// the outcome into the parent. Returns the final result when the popped
    /// frame was the last one.
    fn frame_return(
        &mut self,
        mut result: InterpreterResult,
    ) -> Result<Option<FrameResult>, EVMError<DB::Error>> {
        let frame = self.frames.pop().unwrap();

        if frame.is_create {
            self.return_from_create_frame(&frame, &mut result);
        } else if matches!(result.result, return_ok!()) {
            self.context.journaled_state.checkpoint_commit();
        } else {
            self.context.journaled_state.checkpoint_revert(frame.checkpoint);
        }

        if result.result == InstructionResult::FatalExternalError {
            return Err(EVMError::Database(self.context.take_error()));
        }

        let Some(parent) = self.frames.last_mut() else {
            return Ok(Some(FrameResult {
                result,
                created_address: frame.created_address,
            }));
        };

        if frame.is_create {
            parent
                .interpreter
                .insert_create_outcome(result, frame.created_address);
        } else {
            // The memory context pushed around the sub-call is popped before
            // the output lands in the caller's return window.
            parent.interpreter.memory.free_context();
            parent
                .interpreter
                .insert_call_outcome(result, frame.return_memory_offset);
        }
        Ok(None)
    }

    /// Settles a finished create frame: enforces the deployed-code rules,
    /// charges the code deposit and installs the code, or reverts.
    fn return_from_create_frame(&mut self, frame: &CallFrame, result: &mut InterpreterResult) {
        let spec_id = self.context.spec_id();

        if !matches!(result.result, return_ok!()) {
            self.context.journaled_state.checkpoint_revert(frame.checkpoint);
            return;
        }

        // EIP-3541: Reject new contract code starting with the 0xEF byte
        if spec_id.is_enabled_in(SpecId::LONDON) && result.output.first() == Some(&0xEF) {
            self.context.journaled_state.checkpoint_revert(frame.checkpoint);
            result.result = InstructionResult::CreateContractStartingWithEF;
            return;
        }

        // EIP-170: Contract code size limit
        if spec_id.is_enabled_in(SpecId::SPURIOUS_DRAGON)
            && result.output.len() > self.context.env.cfg.max_code_size()
        {
            self.context.journaled_state.checkpoint_revert(frame.checkpoint);
            result.result = InstructionResult::CreateContractSizeLimit;
            return;
        }

        let gas_for_code = result.output.len() as u64 * gas::CODEDEPOSIT;
        if !result.gas.record_cost(gas_for_code) {
            // EIP-2 point 3: if contract creation does not have enough gas to
            // pay for the final fee of adding the code to the state, the
            // creation fails rather than leaving an empty contract.
            if spec_id.is_enabled_in(SpecId::HOMESTEAD) {
                self.context.journaled_state.checkpoint_revert(frame.checkpoint);
                result.result = InstructionResult::OutOfGas;
                return;
            } else {
                result.output = Bytes::new();
            }
        }

        self.context.journaled_state.checkpoint_commit();

        let address = frame
            .created_address
            .expect("create frame carries the created address");
        let bytecode = match self.context.env.cfg.perf_analyse_created_bytecodes {
            AnalysisKind::Raw => Bytecode::new_raw(result.output.clone()),
            AnalysisKind::Analyse => Bytecode::new_raw(result.output.clone()).into_analyzed(),
        };
        self.context.journaled_state.set_code(address, bytecode);

        result.result = InstructionResult::Return;
    }

    /// Prepares a call frame: depth check, code resolution, checkpoint and
    /// value transfer, precompile dispatch.
    fn make_call_frame(
        &mut self,
        inputs: &CallInputs,
    ) -> Result<FrameOrResult, EVMError<DB::Error>> {
        let gas = Gas::new(inputs.gas_limit);

        // Check the depth of the call stack.
        if self.context.journaled_state.depth() as u64 >= CALL_STACK_LIMIT {
            return Ok(FrameOrResult::Result(InterpreterResult::new(
                InstructionResult::CallTooDeep,
                Bytes::new(),
                gas,
            )));
        }

        // Load the code of the callee.
        let (account, _) = self
            .context
            .journaled_state
            .load_code(inputs.contract, &mut self.context.db)
            .map_err(EVMError::Database)?;
        let code_hash = account.info.code_hash();
        let bytecode = account.info.code.clone().unwrap_or_default();

        // Create the frame checkpoint.
        let checkpoint = self.context.journaled_state.checkpoint();

        if inputs.transfer.value.is_zero() {
            // Touch the target. For the EIP-158 state clear this can erase
            // an empty account at the end of the transaction.
            self.context
                .journaled_state
                .load_account(inputs.context.address, &mut self.context.db)
                .map_err(EVMError::Database)?;
            self.context.journaled_state.touch(&inputs.context.address);
        } else if let Some(transfer_error) = self
            .context
            .journaled_state
            .transfer(
                &inputs.transfer.source,
                &inputs.transfer.target,
                inputs.transfer.value,
                &mut self.context.db,
            )
            .map_err(EVMError::Database)?
        {
            self.context.journaled_state.checkpoint_revert(checkpoint);
            let result = match transfer_error {
                TransferError::OutOfFunds => InstructionResult::OutOfFunds,
                TransferError::OverflowPayment => InstructionResult::OverflowPayment,
                TransferError::CreateCollision => InstructionResult::CreateCollision,
            };
            return Ok(FrameOrResult::Result(InterpreterResult::new(
                result,
                Bytes::new(),
                gas,
            )));
        }

        // Precompile dispatch.
        if let Some(precompile) = self.context.precompiles.get(&inputs.contract) {
            let mut result = match precompile(&inputs.input, gas.limit()) {
                Ok(output) => {
                    let mut gas = gas;
                    // The precompile checked its cost against the limit.
                    let _ = gas.record_cost(output.gas_used);
                    InterpreterResult::new(InstructionResult::Return, output.bytes, gas)
                }
                Err(e) => InterpreterResult::new(
                    if e.is_oog() {
                        InstructionResult::PrecompileOOG
                    } else {
                        InstructionResult::PrecompileError
                    },
                    Bytes::new(),
                    gas,
                ),
            };
            if matches!(result.result, return_ok!()) {
                self.context.journaled_state.checkpoint_commit();
            } else {
                result.gas.spend_all();
                self.context.journaled_state.checkpoint_revert(checkpoint);
            }
            return Ok(FrameOrResult::Result(result));
        }

        // A call to an account without code is a successful empty execution.
        if bytecode.is_empty() {
            self.context.journaled_state.checkpoint_commit();
            return Ok(FrameOrResult::Result(InterpreterResult::new(
                InstructionResult::Stop,
                Bytes::new(),
                gas,
            )));
        }

        let contract =
            Contract::new_with_context(inputs.input.clone(), bytecode, code_hash, &inputs.context);
        let interpreter = Interpreter::new(
            contract,
            inputs.gas_limit,
            inputs.is_static,
            self.context.spec_id(),
            self.context.env.cfg.memory_limit,
        );

        Ok(FrameOrResult::Frame(CallFrame {
            interpreter,
            checkpoint,
            return_memory_offset: inputs.return_memory_offset,
            is_create: false,
            created_address: None,
        }))
    }

    /// Prepares a create frame: depth check, nonce increment, address
    /// derivation and account creation under a checkpoint.
    fn make_create_frame(
        &mut self,
        inputs: &CreateInputs,
    ) -> Result<FrameOrResult, EVMError<DB::Error>> {
        let spec_id = self.context.spec_id();
        let gas = Gas::new(inputs.gas_limit);
        let return_result = |result| {
            Ok(FrameOrResult::Result(InterpreterResult::new(
                result,
                Bytes::new(),
                gas,
            )))
        };

        // Check the depth of the call stack.
        if self.context.journaled_state.depth() as u64 >= CALL_STACK_LIMIT {
            return return_result(InstructionResult::CallTooDeep);
        }

        // Fetch the balance of the caller.
        let (caller_account, _) = self
            .context
            .journaled_state
            .load_account(inputs.caller, &mut self.context.db)
            .map_err(EVMError::Database)?;

        // Check if the caller has enough balance to send to the created
        // contract.
        if caller_account.info.balance < inputs.value {
            return return_result(InstructionResult::OutOfFunds);
        }

        // Increment the nonce of the caller.
        let old_nonce = match self.context.journaled_state.inc_nonce(inputs.caller) {
            Some(nonce) => nonce - 1,
            None => return return_result(InstructionResult::Return),
        };

        // Derive the created address.
        let init_code_hash = keccak256(&inputs.init_code);
        let created_address = match inputs.scheme {
            CreateScheme::Create => inputs.caller.create(old_nonce),
            CreateScheme::Create2 { salt } => inputs
                .caller
                .create2(B256::from(salt), init_code_hash),
        };

        // Load the account so that it is warm for the access list.
        self.context
            .journaled_state
            .load_account(created_address, &mut self.context.db)
            .map_err(EVMError::Database)?;

        // Create the account, transfer the endowment and take the frame
        // checkpoint.
        let checkpoint = match self.context.journaled_state.create_account_checkpoint(
            inputs.caller,
            created_address,
            inputs.value,
            spec_id,
        ) {
            Ok(checkpoint) => checkpoint,
            Err(TransferError::OutOfFunds) => return return_result(InstructionResult::OutOfFunds),
            Err(TransferError::OverflowPayment) => {
                return return_result(InstructionResult::OverflowPayment)
            }
            Err(TransferError::CreateCollision) => {
                return return_result(InstructionResult::CreateCollision)
            }
        };

        let contract = Contract::new(
            Bytes::new(),
            Bytecode::new_raw(inputs.init_code.clone()),
            init_code_hash,
            created_address,
            inputs.caller,
            inputs.value,
        );
        let interpreter = Interpreter::new(
            contract,
            inputs.gas_limit,
            false,
            spec_id,
            self.context.env.cfg.memory_limit,
        );

        Ok(FrameOrResult::Frame(CallFrame {
            interpreter,
            checkpoint,
            return_memory_offset: (0, 0),
            is_create: true,
            created_address: Some(created_address),
        }))
    }

    /// Post-execution accounting: the final refund, caller reimbursement,
    /// beneficiary reward and the journal finalization.
    fn post_execution(
        &mut self,
        frame_result: FrameResult,
        is_create: bool,
    ) -> EVMResult<DB::Error> {
        let spec_id = self.context.spec_id();
        let result = frame_result.result;

        // Merge the frame gas into a tracker over the whole transaction; the
        // intrinsic gas is the part the frame limit never contained.
        let mut gas = Gas::new_spent(self.context.env.tx.gas_limit);
        match result.result {
            return_ok!() => {
                gas.erase_cost(result.gas.remaining());
                gas.record_refund(result.gas.refunded());
            }
            return_revert!() => {
                gas.erase_cost(result.gas.remaining());
            }
            _ => {}
        }

        // EIP-3529 final refund cap; refunds can be disabled outright.
        if self.context.env.cfg.disable_gas_refund {
            gas.set_refund(0);
        } else {
            gas.set_final_refund(spec_id.is_enabled_in(SpecId::LONDON));
        }
        let gas_refunded = gas.refunded() as u64;

        let effective_gas_price = self.context.env.effective_gas_price();

        // Reimburse the caller for the remaining and the refunded gas.
        let caller = self.context.env.tx.caller;
        let (caller_account, _) = self
            .context
            .journaled_state
            .load_account(caller, &mut self.context.db)
            .map_err(EVMError::Database)?;
        caller_account.info.balance = caller_account.info.balance.saturating_add(
            effective_gas_price * U256::from(gas.remaining() + gas_refunded),
        );

        // Reward the beneficiary.
        if !self.context.env.cfg.disable_beneficiary_reward {
            let beneficiary = self.context.env.block.coinbase;
            // EIP-1559: the base fee is burned; only the tip goes to the
            // beneficiary.
            let coinbase_gas_price = if spec_id.is_enabled_in(SpecId::LONDON) {
                effective_gas_price.saturating_sub(self.context.env.block.basefee)
            } else {
                effective_gas_price
            };
            let (coinbase_account, _) = self
                .context
                .journaled_state
                .load_account(beneficiary, &mut self.context.db)
                .map_err(EVMError::Database)?;
            coinbase_account.mark_touch();
            coinbase_account.info.balance = coinbase_account.info.balance.saturating_add(
                coinbase_gas_price * U256::from(gas.spent() - gas_refunded),
            );
        }

        let final_gas_used = gas.spent() - gas_refunded;

        let (state, logs) = self.context.journaled_state.finalize();

        let output = if is_create {
            Output::Create(result.output, frame_result.created_address)
        } else {
            Output::Call(result.output)
        };

        let exec_result = match SuccessOrHalt::from(result.result) {
            SuccessOrHalt::Success(reason) => ExecutionResult::Success {
                reason,
                gas_used: final_gas_used,
                gas_refunded,
                logs,
                output,
            },
            SuccessOrHalt::Revert => ExecutionResult::Revert {
                gas_used: final_gas_used,
                output: output.into_data(),
            },
            SuccessOrHalt::Halt(reason) => ExecutionResult::Halt {
                reason,
                gas_used: final_gas_used,
            },
            SuccessOrHalt::FatalExternalError => {
                return Err(EVMError::Database(self.context.take_error()))
            }
            SuccessOrHalt::InternalContinue | SuccessOrHalt::InternalCallOrCreate => {
                panic!("internal instruction result escaped: {:?}", result.result)
            }
        };

        Ok(ResultAndState {
            result: exec_result,
            state,
        })
    }
}
