//! Withdrawal-mode fallback paths
//!
//! Two independent escape hatches with independent replay ledgers:
//!
//! | Path | Identity | Replay ledger |
//! |------|----------|---------------|
//! | Deposit request | queue index | `DepositRequest::withdrawn` |
//! | Merkle tree | `(account_id, token)` leaf | `WithdrawnSet` |
//!
//! A single owner/token can be claimable on both paths at once: the
//! committed balance through the tree, and unfolded deposits through the
//! queue.

use super::withdrawn_set::WithdrawnSet;
use crate::error::{ExchangeError, ExchangeResult};
use rx_01_account_tree::{verify_balance_proof, BalanceProof};
use serde::{Deserialize, Serialize};
use shared_types::{is_zero_address, Address, Hash};

/// Which fallback entry point paid out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalPath {
    DepositRequest,
    MerkleTree,
    MerkleTreeWithProof,
    /// Block payout the vault refused at commit time
    PendingPayout,
}

impl WithdrawalPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalPath::DepositRequest => "deposit_request",
            WithdrawalPath::MerkleTree => "merkle_tree",
            WithdrawalPath::MerkleTreeWithProof => "merkle_tree_with_proof",
            WithdrawalPath::PendingPayout => "pending_payout",
        }
    }
}

/// Where proceeds for `owner` go. The zero address is the protocol fee
/// account; its funds go to the fee vault.
pub fn recipient_for(owner: &Address, protocol_fee_vault: &Address) -> Address {
    if is_zero_address(owner) {
        *protocol_fee_vault
    } else {
        *owner
    }
}

/// Check a balance proof against the trusted root and the replay ledger.
pub fn check_merkle_claim(
    proof: &BalanceProof,
    root: &Hash,
    withdrawn: &WithdrawnSet,
) -> ExchangeResult<()> {
    if !verify_balance_proof(proof, root) {
        return Err(ExchangeError::InvalidMerkleTreeData {
            account_id: proof.account_id,
            token: proof.token,
        });
    }
    if withdrawn.contains(proof.account_id, proof.token) {
        return Err(ExchangeError::BalanceWithdrawnAlready {
            account_id: proof.account_id,
            token: proof.token,
        });
    }
    Ok(())
}
