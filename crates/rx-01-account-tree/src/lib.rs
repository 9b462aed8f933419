//! # Account Tree (rx-01)
//!
//! The account tree is the source of truth for balances committed by proven
//! blocks. Each account slot holds an owner, an EdDSA public key, a nonce and
//! a per-token balance sub-tree. The exchange only consumes three things from
//! it: the root, the leaf hash of an account, and inclusion-proof
//! verification.
//!
//! ## Tree Shape
//!
//! ```text
//!                      accounts root (depth 24)
//!                     /                        \
//!                  ...                          ...
//!                  /
//!       account leaf = H(owner ‖ pk.x ‖ pk.y ‖ nonce ‖ balances root)
//!                                                     │
//!                                  balances root (depth 16, keyed by TokenId)
//!                                                     │
//!                                     balance leaf = H(balance)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Untouched slots hash to the per-level default | `sparse_tree.rs` |
//! | INVARIANT-2 | Every generated proof verifies against the current root | `tree.rs` |
//! | INVARIANT-3 | Balances never go negative | `Account::debit` |
//! | INVARIANT-4 | An account slot keeps its first owner | `AccountTree::ensure_account` |
//!
//! ## Hexagonal Architecture
//!
//! This crate is pure domain logic with no I/O. The exchange reaches it through
//! its `MerkleTreeDataSource` port.

pub mod domain;

pub use domain::{
    compute_account_leaf, compute_balance_leaf, hash_pair, verify_balance_proof, Account, AccountSummary,
    AccountTree, BalanceProof, SparseMerkleTree, TreeError, TreeResult, ACCOUNT_LEAF_DOMAIN,
    ACCOUNT_TREE_DEPTH, BALANCE_LEAF_DOMAIN, BALANCE_TREE_DEPTH, NODE_DOMAIN,
};
