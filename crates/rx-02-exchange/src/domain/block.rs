//! Blocks and their public input
//!
//! A block moves the accounts root from `old_root` to `new_merkle_root`,
//! consumes a prefix of each request queue and lists the payouts the
//! exchange must release. The proof covers all of it through one hash:
//!
//! ```text
//! public_input = keccak(
//!     old_root ‖ new_root ‖ timestamp
//!   ‖ deposit_start ‖ deposit_end
//!   ‖ withdrawal_start ‖ withdrawal_end
//!   ‖ (recipient ‖ token ‖ amount)*
//! )
//! ```

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{u256_to_be_bytes, Address, Hash, Timestamp, TokenId, U256};
use std::ops::Range;

/// Opaque proof bytes, checked only by the `BlockVerifier` port.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProof(pub Vec<u8>);

/// Funds a block releases from custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalPayout {
    pub recipient: Address,
    pub token: TokenId,
    pub amount: U256,
}

/// Block as submitted by the operator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub new_merkle_root: Hash,
    pub timestamp: Timestamp,
    /// Deposit requests folded by this block
    pub num_deposits: u64,
    /// Withdrawal requests folded by this block
    pub num_withdrawal_requests: u64,
    pub payouts: Vec<WithdrawalPayout>,
    pub proof: BlockProof,
}

/// Request ranges and roots a block commits to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    pub old_root: Hash,
    pub deposits: Range<u64>,
    pub withdrawals: Range<u64>,
}

/// Hash of everything the proof attests to.
pub fn compute_public_input(block: &Block, context: &BlockContext) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(context.old_root);
    hasher.update(block.new_merkle_root);
    hasher.update(block.timestamp.to_be_bytes());
    hasher.update(context.deposits.start.to_be_bytes());
    hasher.update(context.deposits.end.to_be_bytes());
    hasher.update(context.withdrawals.start.to_be_bytes());
    hasher.update(context.withdrawals.end.to_be_bytes());
    for payout in &block.payouts {
        hasher.update(payout.recipient);
        hasher.update(payout.token.to_be_bytes());
        hasher.update(u256_to_be_bytes(&payout.amount));
    }
    hasher.finalize().into()
}
