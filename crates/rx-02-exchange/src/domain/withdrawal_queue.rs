//! On-chain withdrawal requests
//!
//! Submitted outside a block; the operator must fold them like deposits.
//! An unprocessed request ages toward withdrawal mode exactly as a deposit
//! does.

use super::queue::{QueuedRequest, RequestQueue};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Timestamp, TokenId, U256};

/// Pending on-chain withdrawal request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub index: u64,
    pub account_id: AccountId,
    pub owner: Address,
    pub token: TokenId,
    pub amount: U256,
    pub timestamp: Timestamp,
    pub fulfilled: bool,
}

impl QueuedRequest for WithdrawalRequest {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn mark_folded(&mut self) {
        self.fulfilled = true;
    }
}

pub type WithdrawalQueue = RequestQueue<WithdrawalRequest>;

impl RequestQueue<WithdrawalRequest> {
    pub fn enqueue(
        &mut self,
        account_id: AccountId,
        owner: Address,
        token: TokenId,
        amount: U256,
        timestamp: Timestamp,
    ) -> u64 {
        self.push(|index| WithdrawalRequest {
            index,
            account_id,
            owner,
            token,
            amount,
            timestamp,
            fulfilled: false,
        })
    }
}
