//! # Domain Layer
//!
//! - `sparse_tree`: fixed-depth binary sparse Merkle tree
//! - `account`: account record with its balances sub-tree
//! - `tree`: the account tree and proof generation
//! - `proof`: balance inclusion proofs and their verification
//! - `value_objects`: depths and hashing domains

pub mod account;
pub mod errors;
pub mod proof;
pub mod sparse_tree;
pub mod tree;
pub mod value_objects;

pub use account::{compute_account_leaf, compute_balance_leaf, Account, AccountSummary};
pub use errors::{TreeError, TreeResult};
pub use proof::{verify_balance_proof, BalanceProof};
pub use sparse_tree::{hash_pair, SparseMerkleTree};
pub use tree::AccountTree;
pub use value_objects::*;
