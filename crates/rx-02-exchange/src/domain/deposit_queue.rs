//! Deposit requests
//!
//! A deposit is custodial from the moment it is queued but only reaches an
//! account balance once a block folds it. Until then the request record is
//! the sole proof of ownership, which is what the deposit-request fallback
//! pays out against.

use super::queue::{QueuedRequest, RequestQueue};
use crate::error::{ExchangeError, ExchangeResult};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Timestamp, TokenId, U256};

/// Pending deposit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub index: u64,
    pub account_id: AccountId,
    pub owner: Address,
    pub token: TokenId,
    pub amount: U256,
    pub timestamp: Timestamp,
    /// Set when folded into a block or withdrawn directly
    pub withdrawn: bool,
}

impl QueuedRequest for DepositRequest {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn mark_folded(&mut self) {
        self.withdrawn = true;
    }
}

pub type DepositQueue = RequestQueue<DepositRequest>;

impl RequestQueue<DepositRequest> {
    pub fn enqueue(
        &mut self,
        account_id: AccountId,
        owner: Address,
        token: TokenId,
        amount: U256,
        timestamp: Timestamp,
    ) -> u64 {
        self.push(|index| DepositRequest {
            index,
            account_id,
            owner,
            token,
            amount,
            timestamp,
            withdrawn: false,
        })
    }

    /// Check that `(owner, token, index)` names a claimable request.
    ///
    /// Arguments must match the stored entry exactly. Requests folded into a
    /// block count as withdrawn: their funds now live in the account tree.
    pub fn check_claim(
        &self,
        owner: &Address,
        token: TokenId,
        index: u64,
    ) -> ExchangeResult<&DepositRequest> {
        let request = self
            .get(index)
            .ok_or(ExchangeError::DepositNotFound { index })?;

        if request.owner != *owner || request.token != token {
            return Err(ExchangeError::DepositMismatch { index });
        }
        if request.withdrawn || self.is_folded(index) {
            return Err(ExchangeError::DepositWithdrawnAlready { index });
        }
        Ok(request)
    }

    pub fn mark_withdrawn(&mut self, index: u64) {
        if let Some(request) = self.get_mut(index) {
            request.withdrawn = true;
        }
    }
}
