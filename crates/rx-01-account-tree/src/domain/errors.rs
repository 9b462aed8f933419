//! # Domain Errors

use shared_types::{AccountId, TokenId, U256};
use thiserror::Error;

/// Errors raised by the account tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No account exists in this slot.
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: AccountId },

    /// Debit larger than the committed balance.
    #[error("Insufficient balance in account {account_id} token {token}: available {available}, required {required}")]
    InsufficientBalance {
        account_id: AccountId,
        token: TokenId,
        available: U256,
        required: U256,
    },

    /// Credit would overflow U256.
    #[error("Balance overflow in account {account_id} token {token}")]
    BalanceOverflow { account_id: AccountId, token: TokenId },

    /// Leaf index beyond the tree capacity.
    #[error("Leaf index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: u64, capacity: u64 },

    /// Slot already owned by a different address.
    #[error("Account {account_id} is owned by a different address")]
    OwnerMismatch { account_id: AccountId },
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
