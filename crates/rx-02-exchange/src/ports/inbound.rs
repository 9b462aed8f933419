//! Driving Ports (API - Inbound)
//!
//! Every call is synchronous and atomic with respect to every other call.
//! Mutating calls evaluate the mode predicates first and persist any flip
//! before acting, even when they end up rejecting.

use crate::domain::{Block, DepositRequest, ExchangeMode, ExchangeState, WithdrawalRequest};
use crate::error::ExchangeResult;
use rx_01_account_tree::BalanceProof;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Hash, TokenId, U256};

/// Result of an accepted block batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub blocks: usize,
    pub new_root: Hash,
    pub deposits_folded: u64,
    pub withdrawals_folded: u64,
    pub payouts: usize,
    /// Payouts the vault refused; owed to their recipients
    pub payouts_deferred: usize,
}

/// Primary exchange API
pub trait ExchangeApi: Send + Sync {
    /// Queue a deposit. Returns its index, the handle for
    /// `withdraw_from_deposit_request`.
    fn deposit(&self, owner: Address, token: TokenId, amount: U256) -> ExchangeResult<u64>;

    /// Queue an on-chain withdrawal request. Returns its index.
    fn request_withdrawal(&self, owner: Address, token: TokenId, amount: U256)
        -> ExchangeResult<u64>;

    /// Apply a batch of proven blocks. Operator only.
    fn submit_blocks(&self, blocks: Vec<Block>, operator: Address) -> ExchangeResult<BatchReceipt>;

    /// Start the shutdown window. Owner only.
    fn shutdown(&self, caller: Address) -> ExchangeResult<()>;

    /// Pure predicate; never mutates.
    fn is_in_withdrawal_mode(&self) -> bool;

    /// Pay out an unfolded deposit request to its owner.
    fn withdraw_from_deposit_request(
        &self,
        owner: Address,
        token: TokenId,
        index: u64,
    ) -> ExchangeResult<U256>;

    /// Pay out the committed balance using published tree data.
    fn withdraw_from_merkle_tree(&self, owner: Address, token: TokenId) -> ExchangeResult<U256>;

    /// Pay out the committed balance using a caller-supplied proof.
    fn withdraw_from_merkle_tree_with_proof(&self, proof: BalanceProof) -> ExchangeResult<U256>;

    /// Pull block payouts owed to `recipient` in `token`. Works in every
    /// mode; returns zero when nothing is owed.
    fn withdraw_pending_payout(&self, recipient: Address, token: TokenId) -> ExchangeResult<U256>;

    // Queries

    /// Mode re-derived for the current time.
    fn mode(&self) -> ExchangeMode;

    fn merkle_root(&self) -> Hash;

    fn num_blocks_processed(&self) -> u64;

    fn num_accounts(&self) -> u32;

    fn account_id(&self, owner: &Address) -> Option<AccountId>;

    fn deposit_request(&self, index: u64) -> Option<DepositRequest>;

    fn withdrawal_request(&self, index: u64) -> Option<WithdrawalRequest>;

    fn num_deposit_requests(&self) -> u64;

    fn num_withdrawal_requests(&self) -> u64;

    fn deposit_queue_head(&self) -> u64;

    fn withdrawal_queue_head(&self) -> u64;

    /// Block payouts owed to `recipient` after a refused transfer.
    fn pending_payout(&self, recipient: &Address, token: TokenId) -> U256;

    fn snapshot(&self) -> ExchangeState;
}
