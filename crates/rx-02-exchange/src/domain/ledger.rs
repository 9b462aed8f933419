//! Block ledger
//!
//! The only writer of the exchange's Merkle root. A batch is validated in
//! full against a read-only view (`plan_batch`) and only then committed, so
//! a malformed block anywhere in the batch leaves no trace.

use super::block::{compute_public_input, Block, BlockContext, BlockProof, WithdrawalPayout};
use super::deposit_queue::DepositQueue;
use super::withdrawal_queue::WithdrawalQueue;
use crate::error::{ExchangeError, ExchangeResult};
use serde::{Deserialize, Serialize};
use shared_types::{Hash, Timestamp, TokenId, U256};
use std::collections::BTreeMap;
use std::ops::Range;

/// A committed block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub block_number: u64,
    pub old_root: Hash,
    pub new_root: Hash,
    pub timestamp: Timestamp,
    pub public_input: Hash,
    pub deposits: Range<u64>,
    pub withdrawals: Range<u64>,
    pub num_payouts: usize,
}

/// Validated batch, ready to commit
#[derive(Clone, Debug)]
pub struct BatchPlan {
    pub records: Vec<BlockRecord>,
    pub deposits_folded: u64,
    pub withdrawals_folded: u64,
    pub payouts: Vec<WithdrawalPayout>,
    /// Sum of payouts per token
    pub payout_totals: BTreeMap<TokenId, U256>,
}

impl BatchPlan {
    pub fn new_root(&self) -> Option<Hash> {
        self.records.last().map(|record| record.new_root)
    }
}

#[derive(Clone, Debug)]
pub struct BlockLedger {
    merkle_root: Hash,
    last_block_timestamp: Timestamp,
    records: Vec<BlockRecord>,
}

impl BlockLedger {
    pub fn new(genesis_root: Hash) -> Self {
        Self {
            merkle_root: genesis_root,
            last_block_timestamp: 0,
            records: Vec::new(),
        }
    }

    pub fn merkle_root(&self) -> Hash {
        self.merkle_root
    }

    pub fn num_blocks_processed(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn block(&self, block_number: u64) -> Option<&BlockRecord> {
        self.records.get(block_number as usize)
    }

    /// Validate a whole batch without mutating anything.
    ///
    /// Checks per block: timestamps are monotone and not in the future, the
    /// folded counts fit what is pending, and `verify` accepts the proof for
    /// the computed public input. Across the batch: no request older than
    /// `max_age_forced` may remain unprocessed afterwards.
    pub fn plan_batch(
        &self,
        blocks: &[Block],
        deposits: &DepositQueue,
        withdrawals: &WithdrawalQueue,
        now: Timestamp,
        max_age_forced: u64,
        verify: impl Fn(&Hash, &BlockProof) -> bool,
    ) -> ExchangeResult<BatchPlan> {
        if blocks.is_empty() {
            return Err(invalid(0, "empty batch"));
        }

        let mut root = self.merkle_root;
        let mut last_timestamp = self.last_block_timestamp;
        let mut deposit_cursor = deposits.head();
        let mut withdrawal_cursor = withdrawals.head();
        let mut records = Vec::with_capacity(blocks.len());
        let mut payouts = Vec::new();
        let mut payout_totals: BTreeMap<TokenId, U256> = BTreeMap::new();

        for (i, block) in blocks.iter().enumerate() {
            if block.timestamp > now {
                return Err(invalid(i, "timestamp in the future"));
            }
            if block.timestamp < last_timestamp {
                return Err(invalid(i, "timestamp before previous block"));
            }

            let deposit_end = deposit_cursor
                .checked_add(block.num_deposits)
                .filter(|end| *end <= deposits.len())
                .ok_or_else(|| invalid(i, "folds more deposits than pending"))?;
            let withdrawal_end = withdrawal_cursor
                .checked_add(block.num_withdrawal_requests)
                .filter(|end| *end <= withdrawals.len())
                .ok_or_else(|| invalid(i, "folds more withdrawal requests than pending"))?;

            let context = BlockContext {
                old_root: root,
                deposits: deposit_cursor..deposit_end,
                withdrawals: withdrawal_cursor..withdrawal_end,
            };
            let public_input = compute_public_input(block, &context);
            if !verify(&public_input, &block.proof) {
                return Err(ExchangeError::InvalidProof { block_index: i });
            }

            for payout in &block.payouts {
                let total = payout_totals.entry(payout.token).or_default();
                *total = total
                    .checked_add(payout.amount)
                    .ok_or(ExchangeError::AmountOverflow {
                        token: payout.token,
                    })?;
            }
            payouts.extend(block.payouts.iter().cloned());

            records.push(BlockRecord {
                block_number: self.num_blocks_processed() + i as u64,
                old_root: root,
                new_root: block.new_merkle_root,
                timestamp: block.timestamp,
                public_input,
                deposits: context.deposits,
                withdrawals: context.withdrawals,
                num_payouts: block.payouts.len(),
            });

            root = block.new_merkle_root;
            last_timestamp = block.timestamp;
            deposit_cursor = deposit_end;
            withdrawal_cursor = withdrawal_end;
        }

        let deposits_folded = deposit_cursor - deposits.head();
        let withdrawals_folded = withdrawal_cursor - withdrawals.head();

        let overdue = |ts: Option<Timestamp>| ts.is_some_and(|ts| now.saturating_sub(ts) > max_age_forced);
        if overdue(deposits.timestamp_after_fold(deposits_folded)) {
            return Err(ExchangeError::ForcedRequestNotProcessed {
                kind: "deposit",
                index: deposit_cursor,
            });
        }
        if overdue(withdrawals.timestamp_after_fold(withdrawals_folded)) {
            return Err(ExchangeError::ForcedRequestNotProcessed {
                kind: "withdrawal",
                index: withdrawal_cursor,
            });
        }

        Ok(BatchPlan {
            records,
            deposits_folded,
            withdrawals_folded,
            payouts,
            payout_totals,
        })
    }

    /// Apply a plan produced by `plan_batch` against the current state.
    pub fn commit(&mut self, plan: &BatchPlan) {
        if let Some(last) = plan.records.last() {
            self.merkle_root = last.new_root;
            self.last_block_timestamp = last.timestamp;
        }
        self.records.extend(plan.records.iter().cloned());
    }
}

fn invalid(block_index: usize, reason: &str) -> ExchangeError {
    ExchangeError::InvalidBlock {
        block_index,
        reason: reason.to_string(),
    }
}
