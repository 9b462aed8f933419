//! # Value Objects
//!
//! Tree depths and hash domain tags.

/// Depth of the accounts tree (2^24 account slots).
pub const ACCOUNT_TREE_DEPTH: u8 = 24;

/// Depth of each account's balances tree (one slot per `TokenId`).
pub const BALANCE_TREE_DEPTH: u8 = 16;

/// Domain tag prepended when hashing two child nodes.
pub const NODE_DOMAIN: u8 = 0x01;

/// Domain tag for account leaves.
pub const ACCOUNT_LEAF_DOMAIN: u8 = 0x02;

/// Domain tag for balance leaves.
pub const BALANCE_LEAF_DOMAIN: u8 = 0x03;
