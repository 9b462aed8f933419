//! Exchange Service - Core business logic
//!
//! All state sits behind one mutex, so every entry point runs in a single
//! total order. Each mutating call:
//!
//! 1. reads `now` and persists any mode transition that has fired,
//! 2. checks the mode guard (before any authorization check),
//! 3. validates everything it needs,
//! 4. moves funds through the vault,
//! 5. records the change and publishes events.
//!
//! A failure in steps 2-4 leaves the exchange exactly as step 1 left it.
//! `submit_blocks` is the exception to the ordering: it commits first and
//! then pays, because a committed payout can only be delivered or owed.

use crate::config::ExchangeConfig;
use crate::domain::{
    check_merkle_claim, recipient_for, AccountRegistry, Block, BlockLedger, BlockRecord,
    DepositQueue, DepositRequest, ExchangeMode, ExchangeState, ModeChange, ModeController,
    ModeInputs, PendingPayouts, WithdrawalPath, WithdrawalQueue, WithdrawalRequest, WithdrawnSet,
};
use crate::error::{ExchangeError, ExchangeResult};
use crate::events::ExchangeEvent;
use crate::metrics;
use crate::ports::inbound::{BatchReceipt, ExchangeApi};
use crate::ports::outbound::{
    BlockVerifier, EventPublisher, MerkleTreeDataSource, TimeSource, TokenVault,
};
use parking_lot::Mutex;
use rx_01_account_tree::{AccountTree, BalanceProof};
use shared_types::{
    address_hex, is_zero_address, short_hash, AccountId, Address, Hash, Timestamp, TokenId, U256,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Internal state, guarded by the service mutex
struct ExchangeServiceState {
    mode: ModeController,
    registry: AccountRegistry,
    deposits: DepositQueue,
    withdrawals: WithdrawalQueue,
    ledger: BlockLedger,
    withdrawn: WithdrawnSet,
    pending_payouts: PendingPayouts,
}

impl ExchangeServiceState {
    fn new(config: &ExchangeConfig) -> Self {
        Self {
            mode: ModeController::new(config),
            registry: AccountRegistry::new(),
            deposits: DepositQueue::new(),
            withdrawals: WithdrawalQueue::new(),
            ledger: BlockLedger::new(AccountTree::new().root()),
            withdrawn: WithdrawnSet::new(),
            pending_payouts: PendingPayouts::new(),
        }
    }

    fn mode_inputs(&self, now: Timestamp) -> ModeInputs {
        ModeInputs {
            now,
            oldest_deposit: self.deposits.oldest_pending_timestamp(),
            oldest_withdrawal: self.withdrawals.oldest_pending_timestamp(),
            num_accounts: self.registry.len(),
        }
    }
}

/// Exchange service implementation
pub struct ExchangeService<C, V, K, D, E>
where
    C: TimeSource,
    V: BlockVerifier,
    K: TokenVault,
    D: MerkleTreeDataSource,
    E: EventPublisher,
{
    config: ExchangeConfig,
    state: Mutex<ExchangeServiceState>,
    clock: Arc<C>,
    verifier: Arc<V>,
    vault: Arc<K>,
    tree_data: Arc<D>,
    events: Arc<E>,
}

impl<C, V, K, D, E> ExchangeService<C, V, K, D, E>
where
    C: TimeSource,
    V: BlockVerifier,
    K: TokenVault,
    D: MerkleTreeDataSource,
    E: EventPublisher,
{
    /// Create a new exchange in `Normal` mode with only the fee account.
    pub fn new(
        config: ExchangeConfig,
        clock: Arc<C>,
        verifier: Arc<V>,
        vault: Arc<K>,
        tree_data: Arc<D>,
        events: Arc<E>,
    ) -> ExchangeResult<Self> {
        config.validate()?;
        info!("[rx-02] exchange started ({})", config.describe_roles());

        Ok(Self {
            state: Mutex::new(ExchangeServiceState::new(&config)),
            config,
            clock,
            verifier,
            vault,
            tree_data,
            events,
        })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// A committed block by number.
    pub fn block(&self, block_number: u64) -> Option<BlockRecord> {
        self.state.lock().ledger.block(block_number).cloned()
    }

    /// Persist any fired timing transition and return the resulting mode.
    fn sync_mode(&self, state: &mut ExchangeServiceState, now: Timestamp) -> ExchangeMode {
        let inputs = state.mode_inputs(now);
        if let Some(change) = state.mode.sync(&inputs) {
            self.announce_mode_change(&change);
        }
        state.mode.stored_mode()
    }

    fn announce_mode_change(&self, change: &ModeChange) {
        warn!(
            "[rx-02] mode {} -> {} ({:?}) at {}",
            change.from, change.to, change.reason, change.at
        );
        metrics::set_mode(change.to.as_gauge());
        self.events.publish(ExchangeEvent::ModeChanged {
            from: change.from,
            to: change.to,
            reason: change.reason,
            timestamp: change.at,
        });
    }

    fn require_normal(&self, state: &mut ExchangeServiceState, now: Timestamp) -> ExchangeResult<()> {
        match self.sync_mode(state, now) {
            ExchangeMode::Normal => Ok(()),
            mode => Err(ExchangeError::InvalidMode { mode }),
        }
    }

    fn require_withdrawal_mode(
        &self,
        state: &mut ExchangeServiceState,
        now: Timestamp,
    ) -> ExchangeResult<()> {
        match self.sync_mode(state, now) {
            ExchangeMode::WithdrawalMode => Ok(()),
            mode => Err(ExchangeError::NotInWithdrawMode { mode }),
        }
    }

    fn rejected(&self, operation: &'static str, err: ExchangeError) -> ExchangeError {
        debug!(operation, code = err.code(), "[rx-02] rejected: {}", err);
        metrics::record_rejection(err.code());
        err
    }

    fn update_pending_gauge(&self, state: &ExchangeServiceState) {
        metrics::set_pending_requests(state.deposits.pending(), state.withdrawals.pending());
    }

    fn do_deposit(&self, owner: Address, token: TokenId, amount: U256) -> ExchangeResult<u64> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_normal(state, now)?;

        if is_zero_address(&owner) {
            return Err(ExchangeError::InvalidOwner);
        }
        let (account_id, _) = state.registry.resolve(&owner)?;

        self.vault.deposit(&owner, token, amount)?;

        let (_, created) = state.registry.register(owner)?;
        let index = state.deposits.enqueue(account_id, owner, token, amount, now);

        info!(
            "[rx-02] deposit #{} account {}{} token {} amount {}",
            index,
            account_id,
            if created { " (new)" } else { "" },
            token,
            amount
        );
        metrics::record_deposit();
        self.update_pending_gauge(state);
        self.events.publish(ExchangeEvent::DepositRequested {
            index,
            account_id,
            owner,
            token,
            amount,
            timestamp: now,
        });
        Ok(index)
    }

    fn do_request_withdrawal(
        &self,
        owner: Address,
        token: TokenId,
        amount: U256,
    ) -> ExchangeResult<u64> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_normal(state, now)?;

        let account_id = state
            .registry
            .get(&owner)
            .ok_or_else(|| ExchangeError::AccountNotFound {
                owner: address_hex(&owner),
            })?;
        let index = state
            .withdrawals
            .enqueue(account_id, owner, token, amount, now);

        info!(
            "[rx-02] withdrawal request #{} account {} token {} amount {}",
            index, account_id, token, amount
        );
        metrics::record_withdrawal_request();
        self.update_pending_gauge(state);
        self.events.publish(ExchangeEvent::WithdrawalRequested {
            index,
            account_id,
            owner,
            token,
            amount,
            timestamp: now,
        });
        Ok(index)
    }

    fn do_submit_blocks(&self, blocks: Vec<Block>, operator: Address) -> ExchangeResult<BatchReceipt> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_normal(state, now)?;

        if operator != self.config.operator {
            return Err(ExchangeError::Unauthorized {
                caller: address_hex(&operator),
                action: "submit_blocks",
            });
        }

        let plan = state.ledger.plan_batch(
            &blocks,
            &state.deposits,
            &state.withdrawals,
            now,
            self.config.max_age_request_until_forced,
            |public_input, proof| self.verifier.verify_proof(public_input, proof),
        )?;

        // Funds owed from earlier batches are not available for new payouts.
        for (token, total) in &plan.payout_totals {
            let available = self
                .vault
                .custody(*token)
                .saturating_sub(state.pending_payouts.total(*token));
            if available < *total {
                return Err(ExchangeError::InsufficientCustody {
                    token: *token,
                    available,
                    required: *total,
                });
            }
        }

        state.deposits.fold(plan.deposits_folded)?;
        state.withdrawals.fold(plan.withdrawals_folded)?;
        state.ledger.commit(&plan);

        let mut payouts = plan.payouts.iter();
        let mut deferred = 0;
        for record in &plan.records {
            info!(
                "[rx-02] block #{} committed {} -> {} (deposits {:?}, withdrawals {:?})",
                record.block_number,
                short_hash(&record.old_root),
                short_hash(&record.new_root),
                record.deposits,
                record.withdrawals
            );
            self.events.publish(ExchangeEvent::BlockCommitted {
                block_number: record.block_number,
                old_root: record.old_root,
                new_root: record.new_root,
                public_input: record.public_input,
                deposits: record.deposits.clone(),
                withdrawals: record.withdrawals.clone(),
            });

            for payout in payouts.by_ref().take(record.num_payouts) {
                if let Err(e) = self
                    .vault
                    .release(&payout.recipient, payout.token, payout.amount)
                {
                    warn!(
                        "[rx-02] block #{} payout of token {} amount {} to {} deferred: {}",
                        record.block_number,
                        payout.token,
                        payout.amount,
                        address_hex(&payout.recipient),
                        e
                    );
                    state
                        .pending_payouts
                        .credit(payout.recipient, payout.token, payout.amount);
                    deferred += 1;
                    metrics::record_payout_deferred();
                    self.events.publish(ExchangeEvent::PayoutDeferred {
                        block_number: record.block_number,
                        recipient: payout.recipient,
                        token: payout.token,
                        amount: payout.amount,
                    });
                }
            }
        }
        metrics::record_blocks_committed(plan.records.len() as u64);
        self.update_pending_gauge(state);

        Ok(BatchReceipt {
            blocks: plan.records.len(),
            new_root: state.ledger.merkle_root(),
            deposits_folded: plan.deposits_folded,
            withdrawals_folded: plan.withdrawals_folded,
            payouts: plan.payouts.len(),
            payouts_deferred: deferred,
        })
    }

    fn do_shutdown(&self, caller: Address) -> ExchangeResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_normal(state, now)?;

        if caller != self.config.owner {
            return Err(ExchangeError::Unauthorized {
                caller: address_hex(&caller),
                action: "shutdown",
            });
        }

        let change = state.mode.shutdown(now)?;
        let deadline = state
            .mode
            .shutdown_deadline(state.registry.len())
            .unwrap_or(now);

        self.announce_mode_change(&change);
        self.events.publish(ExchangeEvent::ShutdownStarted {
            timestamp: now,
            deadline,
        });
        info!(
            "[rx-02] shutdown started at {}, withdrawal mode after {} ({} accounts)",
            now,
            deadline,
            state.registry.len()
        );
        Ok(())
    }

    fn do_withdraw_from_deposit_request(
        &self,
        owner: Address,
        token: TokenId,
        index: u64,
    ) -> ExchangeResult<U256> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_withdrawal_mode(state, now)?;

        let amount = state.deposits.check_claim(&owner, token, index)?.amount;
        self.vault.release(&owner, token, amount)?;
        state.deposits.mark_withdrawn(index);

        self.completed(WithdrawalPath::DepositRequest, owner, owner, token, amount);
        Ok(amount)
    }

    fn do_withdraw_from_merkle_tree(&self, owner: Address, token: TokenId) -> ExchangeResult<U256> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_withdrawal_mode(state, now)?;

        let account_id = state
            .registry
            .get(&owner)
            .ok_or_else(|| ExchangeError::AccountNotFound {
                owner: address_hex(&owner),
            })?;
        let root = state.ledger.merkle_root();
        let proof = self
            .tree_data
            .balance_proof(&root, account_id, token)
            .ok_or(ExchangeError::MerkleTreeDataUnavailable { root })?;
        if proof.owner != owner || proof.account_id != account_id || proof.token != token {
            return Err(ExchangeError::InvalidMerkleTreeData { account_id, token });
        }

        self.pay_merkle_claim(state, proof, WithdrawalPath::MerkleTree)
    }

    fn do_withdraw_from_merkle_tree_with_proof(&self, proof: BalanceProof) -> ExchangeResult<U256> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.require_withdrawal_mode(state, now)?;

        self.pay_merkle_claim(state, proof, WithdrawalPath::MerkleTreeWithProof)
    }

    fn do_withdraw_pending_payout(
        &self,
        recipient: Address,
        token: TokenId,
    ) -> ExchangeResult<U256> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.now();
        self.sync_mode(state, now);

        let amount = state.pending_payouts.owed(&recipient, token);
        if amount.is_zero() {
            return Ok(amount);
        }
        self.vault.release(&recipient, token, amount)?;
        state.pending_payouts.settle(&recipient, token);

        self.completed(WithdrawalPath::PendingPayout, recipient, recipient, token, amount);
        Ok(amount)
    }

    /// Shared tail of both tree paths: verify, pay, record.
    fn pay_merkle_claim(
        &self,
        state: &mut ExchangeServiceState,
        proof: BalanceProof,
        path: WithdrawalPath,
    ) -> ExchangeResult<U256> {
        check_merkle_claim(&proof, &state.ledger.merkle_root(), &state.withdrawn)?;

        let recipient = recipient_for(&proof.owner, &self.config.protocol_fee_vault);
        self.vault.release(&recipient, proof.token, proof.balance)?;
        state.withdrawn.insert(proof.account_id, proof.token);

        self.completed(path, proof.owner, recipient, proof.token, proof.balance);
        Ok(proof.balance)
    }

    fn completed(
        &self,
        path: WithdrawalPath,
        owner: Address,
        recipient: Address,
        token: TokenId,
        amount: U256,
    ) {
        info!(
            "[rx-02] {} withdrawal of token {} amount {} to {}",
            path.as_str(),
            token,
            amount,
            address_hex(&recipient)
        );
        metrics::record_fallback_withdrawal(path.as_str());
        self.events.publish(ExchangeEvent::WithdrawalCompleted {
            path,
            owner,
            recipient,
            token,
            amount,
        });
    }
}

impl<C, V, K, D, E> ExchangeApi for ExchangeService<C, V, K, D, E>
where
    C: TimeSource,
    V: BlockVerifier,
    K: TokenVault,
    D: MerkleTreeDataSource,
    E: EventPublisher,
{
    fn deposit(&self, owner: Address, token: TokenId, amount: U256) -> ExchangeResult<u64> {
        self.do_deposit(owner, token, amount)
            .map_err(|e| self.rejected("deposit", e))
    }

    fn request_withdrawal(
        &self,
        owner: Address,
        token: TokenId,
        amount: U256,
    ) -> ExchangeResult<u64> {
        self.do_request_withdrawal(owner, token, amount)
            .map_err(|e| self.rejected("request_withdrawal", e))
    }

    fn submit_blocks(&self, blocks: Vec<Block>, operator: Address) -> ExchangeResult<BatchReceipt> {
        self.do_submit_blocks(blocks, operator)
            .map_err(|e| self.rejected("submit_blocks", e))
    }

    fn shutdown(&self, caller: Address) -> ExchangeResult<()> {
        self.do_shutdown(caller)
            .map_err(|e| self.rejected("shutdown", e))
    }

    fn is_in_withdrawal_mode(&self) -> bool {
        let state = self.state.lock();
        let inputs = state.mode_inputs(self.clock.now());
        state.mode.is_in_withdrawal_mode(&inputs)
    }

    fn withdraw_from_deposit_request(
        &self,
        owner: Address,
        token: TokenId,
        index: u64,
    ) -> ExchangeResult<U256> {
        self.do_withdraw_from_deposit_request(owner, token, index)
            .map_err(|e| self.rejected("withdraw_from_deposit_request", e))
    }

    fn withdraw_from_merkle_tree(&self, owner: Address, token: TokenId) -> ExchangeResult<U256> {
        self.do_withdraw_from_merkle_tree(owner, token)
            .map_err(|e| self.rejected("withdraw_from_merkle_tree", e))
    }

    fn withdraw_from_merkle_tree_with_proof(&self, proof: BalanceProof) -> ExchangeResult<U256> {
        self.do_withdraw_from_merkle_tree_with_proof(proof)
            .map_err(|e| self.rejected("withdraw_from_merkle_tree_with_proof", e))
    }

    fn withdraw_pending_payout(&self, recipient: Address, token: TokenId) -> ExchangeResult<U256> {
        self.do_withdraw_pending_payout(recipient, token)
            .map_err(|e| self.rejected("withdraw_pending_payout", e))
    }

    fn mode(&self) -> ExchangeMode {
        let state = self.state.lock();
        let inputs = state.mode_inputs(self.clock.now());
        state.mode.effective_mode(&inputs)
    }

    fn merkle_root(&self) -> Hash {
        self.state.lock().ledger.merkle_root()
    }

    fn num_blocks_processed(&self) -> u64 {
        self.state.lock().ledger.num_blocks_processed()
    }

    fn num_accounts(&self) -> u32 {
        self.state.lock().registry.len()
    }

    fn account_id(&self, owner: &Address) -> Option<AccountId> {
        self.state.lock().registry.get(owner)
    }

    fn deposit_request(&self, index: u64) -> Option<DepositRequest> {
        self.state.lock().deposits.get(index).cloned()
    }

    fn withdrawal_request(&self, index: u64) -> Option<WithdrawalRequest> {
        self.state.lock().withdrawals.get(index).cloned()
    }

    fn num_deposit_requests(&self) -> u64 {
        self.state.lock().deposits.len()
    }

    fn num_withdrawal_requests(&self) -> u64 {
        self.state.lock().withdrawals.len()
    }

    fn deposit_queue_head(&self) -> u64 {
        self.state.lock().deposits.head()
    }

    fn withdrawal_queue_head(&self) -> u64 {
        self.state.lock().withdrawals.head()
    }

    fn pending_payout(&self, recipient: &Address, token: TokenId) -> U256 {
        self.state.lock().pending_payouts.owed(recipient, token)
    }

    fn snapshot(&self) -> ExchangeState {
        let state = self.state.lock();
        let inputs = state.mode_inputs(self.clock.now());
        ExchangeState {
            mode: state.mode.effective_mode(&inputs),
            merkle_root: state.ledger.merkle_root(),
            num_blocks_processed: state.ledger.num_blocks_processed(),
            oldest_unprocessed_deposit_timestamp: inputs.oldest_deposit,
            oldest_unprocessed_withdrawal_timestamp: inputs.oldest_withdrawal,
            shutdown_start_time: state.mode.shutdown_start(),
            num_accounts: state.registry.len(),
        }
    }
}
