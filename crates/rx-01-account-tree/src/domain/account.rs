//! # Accounts
//!
//! An account owns a balances sub-tree keyed by token. The account leaf
//! commits to the owner, the public key, the nonce and the balances root.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{u256_to_be_bytes, AccountId, Address, Hash, PublicKey, TokenId, U256};
use std::collections::BTreeMap;

use super::errors::{TreeError, TreeResult};
use super::sparse_tree::SparseMerkleTree;
use super::value_objects::{ACCOUNT_LEAF_DOMAIN, BALANCE_LEAF_DOMAIN, BALANCE_TREE_DEPTH};

/// Leaf hash of a single token balance.
pub fn compute_balance_leaf(balance: &U256) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update([BALANCE_LEAF_DOMAIN]);
    hasher.update(u256_to_be_bytes(balance));
    hasher.finalize().into()
}

/// Leaf hash of an account.
pub fn compute_account_leaf(
    owner: &Address,
    public_key: &PublicKey,
    nonce: u32,
    balances_root: &Hash,
) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update([ACCOUNT_LEAF_DOMAIN]);
    hasher.update(owner);
    hasher.update(public_key.x);
    hasher.update(public_key.y);
    hasher.update(nonce.to_be_bytes());
    hasher.update(balances_root);
    hasher.finalize().into()
}

/// Account record as stored in the account tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub owner: Address,
    pub public_key: PublicKey,
    pub nonce: u32,
    balances: BTreeMap<TokenId, U256>,
    balances_tree: SparseMerkleTree,
}

impl Account {
    /// Fresh account with no key, zero nonce and empty balances.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            public_key: PublicKey::default(),
            nonce: 0,
            balances: BTreeMap::new(),
            balances_tree: SparseMerkleTree::new(
                BALANCE_TREE_DEPTH,
                compute_balance_leaf(&U256::zero()),
            ),
        }
    }

    pub fn balance(&self, token: TokenId) -> U256 {
        self.balances.get(&token).copied().unwrap_or_default()
    }

    /// Non-zero balances in token order.
    pub fn balances(&self) -> impl Iterator<Item = (TokenId, U256)> + '_ {
        self.balances.iter().map(|(token, amount)| (*token, *amount))
    }

    pub fn balances_root(&self) -> Hash {
        self.balances_tree.root()
    }

    /// Sibling path for `token` in the balances tree.
    pub fn balance_path(&self, token: TokenId) -> TreeResult<Vec<Hash>> {
        self.balances_tree.proof(token as u64)
    }

    /// Leaf hash of this account in the accounts tree.
    pub fn leaf_hash(&self) -> Hash {
        compute_account_leaf(
            &self.owner,
            &self.public_key,
            self.nonce,
            &self.balances_root(),
        )
    }

    pub(crate) fn credit(
        &mut self,
        account_id: AccountId,
        token: TokenId,
        amount: U256,
    ) -> TreeResult<U256> {
        let updated = self
            .balance(token)
            .checked_add(amount)
            .ok_or(TreeError::BalanceOverflow { account_id, token })?;
        self.set_balance(token, updated)?;
        Ok(updated)
    }

    /// INVARIANT-3: balances never go negative.
    pub(crate) fn debit(
        &mut self,
        account_id: AccountId,
        token: TokenId,
        amount: U256,
    ) -> TreeResult<U256> {
        let available = self.balance(token);
        let updated = available
            .checked_sub(amount)
            .ok_or(TreeError::InsufficientBalance {
                account_id,
                token,
                available,
                required: amount,
            })?;
        self.set_balance(token, updated)?;
        Ok(updated)
    }

    fn set_balance(&mut self, token: TokenId, amount: U256) -> TreeResult<()> {
        self.balances_tree
            .update(token as u64, compute_balance_leaf(&amount))?;
        if amount.is_zero() {
            self.balances.remove(&token);
        } else {
            self.balances.insert(token, amount);
        }
        Ok(())
    }
}

/// Serializable view of an account, without the balances tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub owner: Address,
    pub public_key: PublicKey,
    pub nonce: u32,
    pub balances: Vec<(TokenId, U256)>,
    pub leaf_hash: Hash,
}

impl AccountSummary {
    pub fn of(account_id: AccountId, account: &Account) -> Self {
        Self {
            account_id,
            owner: account.owner,
            public_key: account.public_key,
            nonce: account.nonce,
            balances: account.balances().collect(),
            leaf_hash: account.leaf_hash(),
        }
    }
}
