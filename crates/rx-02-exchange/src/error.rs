//! Error types for the exchange
//!
//! Every variant maps to a stable reason code (`code()`) and to one of the
//! rejection categories (`category()`). All errors are synchronous rejections
//! of the call that produced them; none leave partial state behind.

use crate::domain::mode::ExchangeMode;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Hash, TokenId, U256};
use thiserror::Error;

/// Rejection category of an [`ExchangeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Operation attempted in the wrong mode. Never succeeds on retry.
    Mode,
    /// Idempotency violation on a fallback withdrawal.
    Replay,
    /// Caller-supplied tree data does not match the trusted root.
    DataIntegrity,
    /// Malformed or mismatched arguments.
    Argument,
    /// Caller lacks the required role.
    Authorization,
    /// Block proof rejected by the verifier.
    Proof,
    /// Custody cannot cover, or the vault refused, a release.
    Custody,
}

/// Exchange errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Operation requires `Normal` mode
    #[error("Invalid mode: operation requires Normal, exchange is {mode}")]
    InvalidMode { mode: ExchangeMode },

    /// Fallback withdrawal attempted outside withdrawal mode
    #[error("Not in withdrawal mode: exchange is {mode}")]
    NotInWithdrawMode { mode: ExchangeMode },

    /// Deposit request already withdrawn or folded into a block
    #[error("Deposit request {index} withdrawn already")]
    DepositWithdrawnAlready { index: u64 },

    /// Committed balance already withdrawn
    #[error("Balance of account {account_id} token {token} withdrawn already")]
    BalanceWithdrawnAlready { account_id: AccountId, token: TokenId },

    /// Inclusion proof does not verify against the stored root
    #[error("Invalid Merkle tree data for account {account_id} token {token}")]
    InvalidMerkleTreeData { account_id: AccountId, token: TokenId },

    /// No tree data published for the stored root
    #[error("Merkle tree data unavailable for root {root:?}")]
    MerkleTreeDataUnavailable { root: Hash },

    /// Owner has no account
    #[error("No account registered for owner {owner}")]
    AccountNotFound { owner: String },

    /// Account tree has no free slot
    #[error("Account tree full: capacity {capacity}")]
    TooManyAccounts { capacity: u64 },

    /// Zero address used where a real owner is required
    #[error("Invalid owner: zero address")]
    InvalidOwner,

    /// Deposit index beyond the queue
    #[error("Deposit request {index} not found")]
    DepositNotFound { index: u64 },

    /// Caller arguments differ from the stored deposit request
    #[error("Deposit request {index} does not match owner/token")]
    DepositMismatch { index: u64 },

    /// Caller lacks the required role
    #[error("Unauthorized caller {caller} for {action}")]
    Unauthorized { caller: String, action: &'static str },

    /// Structurally invalid block or batch
    #[error("Invalid block {block_index}: {reason}")]
    InvalidBlock { block_index: usize, reason: String },

    /// Block proof rejected by the verifier
    #[error("Invalid proof for block {block_index}")]
    InvalidProof { block_index: usize },

    /// Batch leaves a request past its forced deadline unprocessed
    #[error("Forced {kind} request {index} not processed")]
    ForcedRequestNotProcessed { kind: &'static str, index: u64 },

    /// Release larger than custody
    #[error("Insufficient custody for token {token}: available {available}, required {required}")]
    InsufficientCustody {
        token: TokenId,
        available: U256,
        required: U256,
    },

    /// Vault refused to transfer to the recipient
    #[error("Transfer of token {token} to {recipient} rejected")]
    TransferRejected { token: TokenId, recipient: String },

    /// Amount arithmetic overflowed
    #[error("Amount overflow for token {token}")]
    AmountOverflow { token: TokenId },

    /// Configuration rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ExchangeError {
    /// Canonical reason string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMode { .. } => "INVALID_MODE",
            Self::NotInWithdrawMode { .. } => "NOT_IN_WITHDRAW_MODE",
            Self::DepositWithdrawnAlready { .. } | Self::BalanceWithdrawnAlready { .. } => {
                "WITHDRAWN_ALREADY"
            }
            Self::InvalidMerkleTreeData { .. } => "INVALID_MERKLE_TREE_DATA",
            Self::MerkleTreeDataUnavailable { .. } => "MERKLE_TREE_DATA_UNAVAILABLE",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::TooManyAccounts { .. } => "TOO_MANY_ACCOUNTS",
            Self::InvalidOwner => "INVALID_OWNER",
            Self::DepositNotFound { .. } => "DEPOSIT_NOT_FOUND",
            Self::DepositMismatch { .. } => "DEPOSIT_MISMATCH",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidBlock { .. } => "INVALID_BLOCK",
            Self::InvalidProof { .. } => "INVALID_PROOF",
            Self::ForcedRequestNotProcessed { .. } => "FORCED_REQUEST_NOT_PROCESSED",
            Self::InsufficientCustody { .. } => "INSUFFICIENT_CUSTODY",
            Self::TransferRejected { .. } => "TRANSFER_REJECTED",
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidMode { .. } | Self::NotInWithdrawMode { .. } => ErrorCategory::Mode,
            Self::DepositWithdrawnAlready { .. } | Self::BalanceWithdrawnAlready { .. } => {
                ErrorCategory::Replay
            }
            Self::InvalidMerkleTreeData { .. } | Self::MerkleTreeDataUnavailable { .. } => {
                ErrorCategory::DataIntegrity
            }
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::InvalidProof { .. } => ErrorCategory::Proof,
            Self::InsufficientCustody { .. }
            | Self::TransferRejected { .. }
            | Self::AmountOverflow { .. } => ErrorCategory::Custody,
            Self::AccountNotFound { .. }
            | Self::TooManyAccounts { .. }
            | Self::InvalidOwner
            | Self::DepositNotFound { .. }
            | Self::DepositMismatch { .. }
            | Self::InvalidBlock { .. }
            | Self::ForcedRequestNotProcessed { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::Argument,
        }
    }
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;
