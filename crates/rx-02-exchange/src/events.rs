//! Outgoing events
//!
//! Published through the `EventPublisher` port after the state change they
//! describe has been applied.

use crate::domain::{ExchangeMode, ModeEvent, WithdrawalPath};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Hash, Timestamp, TokenId, U256};
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExchangeEvent {
    DepositRequested {
        index: u64,
        account_id: AccountId,
        owner: Address,
        token: TokenId,
        amount: U256,
        timestamp: Timestamp,
    },
    WithdrawalRequested {
        index: u64,
        account_id: AccountId,
        owner: Address,
        token: TokenId,
        amount: U256,
        timestamp: Timestamp,
    },
    BlockCommitted {
        block_number: u64,
        old_root: Hash,
        new_root: Hash,
        public_input: Hash,
        deposits: Range<u64>,
        withdrawals: Range<u64>,
    },
    /// A committed payout the vault refused; owed until pulled
    PayoutDeferred {
        block_number: u64,
        recipient: Address,
        token: TokenId,
        amount: U256,
    },
    ShutdownStarted {
        timestamp: Timestamp,
        /// Withdrawal mode starts after this unless the exchange is drained
        deadline: Timestamp,
    },
    ModeChanged {
        from: ExchangeMode,
        to: ExchangeMode,
        reason: ModeEvent,
        timestamp: Timestamp,
    },
    WithdrawalCompleted {
        path: WithdrawalPath,
        owner: Address,
        recipient: Address,
        token: TokenId,
        amount: U256,
    },
}

impl ExchangeEvent {
    /// Short name for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeEvent::DepositRequested { .. } => "deposit_requested",
            ExchangeEvent::WithdrawalRequested { .. } => "withdrawal_requested",
            ExchangeEvent::BlockCommitted { .. } => "block_committed",
            ExchangeEvent::PayoutDeferred { .. } => "payout_deferred",
            ExchangeEvent::ShutdownStarted { .. } => "shutdown_started",
            ExchangeEvent::ModeChanged { .. } => "mode_changed",
            ExchangeEvent::WithdrawalCompleted { .. } => "withdrawal_completed",
        }
    }
}
