//! # Account Tree
//!
//! Accounts keyed by dense `AccountId` slots, committed into a depth-24
//! sparse Merkle tree. Every mutation rehashes the affected account leaf so
//! `root()` is always current.

use shared_types::{AccountId, Address, Hash, PublicKey, TokenId, U256, ZERO_ADDRESS};
use std::collections::BTreeMap;

use super::account::{Account, AccountSummary};
use super::errors::{TreeError, TreeResult};
use super::proof::{verify_balance_proof, BalanceProof};
use super::sparse_tree::SparseMerkleTree;
use super::value_objects::ACCOUNT_TREE_DEPTH;

/// Merkle tree of accounts and their balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTree {
    accounts: BTreeMap<AccountId, Account>,
    tree: SparseMerkleTree,
}

impl AccountTree {
    /// Empty tree holding only the protocol fee account in slot 0.
    ///
    /// The fee account is owned by the zero address, so its leaf equals the
    /// default leaf and the root matches a tree with no accounts at all.
    pub fn new() -> Self {
        let default_leaf = Account::new(ZERO_ADDRESS).leaf_hash();
        let mut accounts = BTreeMap::new();
        accounts.insert(0, Account::new(ZERO_ADDRESS));

        Self {
            accounts,
            tree: SparseMerkleTree::new(ACCOUNT_TREE_DEPTH, default_leaf),
        }
    }

    /// Current accounts root.
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    pub fn account(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    /// Committed balance, zero for unknown accounts or tokens.
    pub fn balance(&self, account_id: AccountId, token: TokenId) -> U256 {
        self.accounts
            .get(&account_id)
            .map(|account| account.balance(token))
            .unwrap_or_default()
    }

    /// Create the account in `account_id` for `owner`, or confirm it exists.
    ///
    /// ## INVARIANT-4: Stable Ownership
    ///
    /// An existing slot with a different owner is rejected.
    pub fn ensure_account(&mut self, account_id: AccountId, owner: Address) -> TreeResult<()> {
        if let Some(existing) = self.accounts.get(&account_id) {
            if existing.owner != owner {
                return Err(TreeError::OwnerMismatch { account_id });
            }
            return Ok(());
        }

        let account = Account::new(owner);
        self.tree.update(account_id as u64, account.leaf_hash())?;
        self.accounts.insert(account_id, account);
        Ok(())
    }

    pub fn set_public_key(&mut self, account_id: AccountId, public_key: PublicKey) -> TreeResult<()> {
        self.mutate(account_id, |account| {
            account.public_key = public_key;
            Ok(())
        })
    }

    pub fn increment_nonce(&mut self, account_id: AccountId) -> TreeResult<u32> {
        self.mutate(account_id, |account| {
            account.nonce = account.nonce.wrapping_add(1);
            Ok(account.nonce)
        })
    }

    /// Add `amount` of `token` to the account. Returns the new balance.
    pub fn credit(&mut self, account_id: AccountId, token: TokenId, amount: U256) -> TreeResult<U256> {
        self.mutate(account_id, |account| account.credit(account_id, token, amount))
    }

    /// Remove `amount` of `token` from the account. Returns the new balance.
    pub fn debit(&mut self, account_id: AccountId, token: TokenId, amount: U256) -> TreeResult<U256> {
        self.mutate(account_id, |account| account.debit(account_id, token, amount))
    }

    /// Build an inclusion proof for one balance under the current root.
    ///
    /// ## INVARIANT-2: Proof Validity
    ///
    /// The returned proof verifies against `self.root()`.
    pub fn balance_proof(&self, account_id: AccountId, token: TokenId) -> TreeResult<BalanceProof> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or(TreeError::AccountNotFound { account_id })?;

        Ok(BalanceProof {
            account_id,
            token,
            owner: account.owner,
            public_key: account.public_key,
            nonce: account.nonce,
            balance: account.balance(token),
            balance_path: account.balance_path(token)?,
            account_path: self.tree.proof(account_id as u64)?,
        })
    }

    /// Check a proof against this tree's current root.
    pub fn verify_proof(&self, proof: &BalanceProof) -> bool {
        verify_balance_proof(proof, &self.root())
    }

    /// Serializable views of every account, in slot order.
    pub fn summaries(&self) -> Vec<AccountSummary> {
        self.accounts
            .iter()
            .map(|(id, account)| AccountSummary::of(*id, account))
            .collect()
    }

    /// Apply `f` to an account and rehash its leaf.
    ///
    /// The change is made on a copy so a failing `f` leaves the tree as it was.
    fn mutate<T>(
        &mut self,
        account_id: AccountId,
        f: impl FnOnce(&mut Account) -> TreeResult<T>,
    ) -> TreeResult<T> {
        let mut account = self
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or(TreeError::AccountNotFound { account_id })?;

        let out = f(&mut account)?;
        self.tree.update(account_id as u64, account.leaf_hash())?;
        self.accounts.insert(account_id, account);
        Ok(out)
    }
}

impl Default for AccountTree {
    fn default() -> Self {
        Self::new()
    }
}
