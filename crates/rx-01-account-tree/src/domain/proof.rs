//! # Balance Inclusion Proofs
//!
//! A balance proof carries everything needed to recompute the accounts root
//! from a single (account, token) balance:
//!
//! 1. balance leaf → balances root via `balance_path`
//! 2. account leaf = H(owner ‖ key ‖ nonce ‖ balances root)
//! 3. account leaf → accounts root via `account_path`
//!
//! Verification needs only the trusted root, never the tree itself.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Hash, PublicKey, TokenId, U256};

use super::account::{compute_account_leaf, compute_balance_leaf};
use super::sparse_tree::SparseMerkleTree;
use super::value_objects::{ACCOUNT_TREE_DEPTH, BALANCE_TREE_DEPTH};

/// Proof that `balance` of `token` is committed for `account_id` under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceProof {
    pub account_id: AccountId,
    pub token: TokenId,
    pub owner: Address,
    pub public_key: PublicKey,
    pub nonce: u32,
    pub balance: U256,
    /// Siblings from the balance leaf to the balances root.
    pub balance_path: Vec<Hash>,
    /// Siblings from the account leaf to the accounts root.
    pub account_path: Vec<Hash>,
}

impl BalanceProof {
    /// Recompute the balances root this proof claims.
    pub fn balances_root(&self) -> Option<Hash> {
        SparseMerkleTree::compute_root(
            &compute_balance_leaf(&self.balance),
            self.token as u64,
            &self.balance_path,
        )
    }

    /// Recompute the account leaf this proof claims.
    pub fn account_leaf(&self) -> Option<Hash> {
        let balances_root = self.balances_root()?;
        Some(compute_account_leaf(
            &self.owner,
            &self.public_key,
            self.nonce,
            &balances_root,
        ))
    }
}

/// Verify a balance proof against a trusted accounts root.
///
/// Path lengths are fixed by the tree depths; anything else is rejected
/// before hashing.
pub fn verify_balance_proof(proof: &BalanceProof, root: &Hash) -> bool {
    if proof.balance_path.len() != BALANCE_TREE_DEPTH as usize
        || proof.account_path.len() != ACCOUNT_TREE_DEPTH as usize
    {
        return false;
    }

    let Some(account_leaf) = proof.account_leaf() else {
        return false;
    };

    SparseMerkleTree::verify(
        &account_leaf,
        proof.account_id as u64,
        &proof.account_path,
        root,
    )
}
