//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Everything the exchange treats as an external collaborator: the clock,
//! the proof system, token custody, published tree data and event sinks.

use crate::domain::BlockProof;
use crate::error::ExchangeResult;
use crate::events::ExchangeEvent;
use rx_01_account_tree::BalanceProof;
use shared_types::{AccountId, Address, Hash, Timestamp, TokenId, U256};

/// Source of the current time
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// Succinct proof verifier
///
/// Opaque to the exchange: it only learns whether `proof` attests to
/// `public_input`.
pub trait BlockVerifier: Send + Sync {
    fn verify_proof(&self, public_input: &Hash, proof: &BlockProof) -> bool;
}

/// Token custody
///
/// Holds deposited funds and releases them to recipients.
pub trait TokenVault: Send + Sync {
    /// Take `amount` of `token` from `from` into custody.
    fn deposit(&self, from: &Address, token: TokenId, amount: U256) -> ExchangeResult<()>;

    /// Release `amount` of `token` from custody to `to`.
    ///
    /// Fails with `InsufficientCustody` and moves nothing when custody is short.
    fn release(&self, to: &Address, token: TokenId, amount: U256) -> ExchangeResult<()>;

    /// Funds of `token` currently in custody.
    fn custody(&self, token: TokenId) -> U256;
}

/// Published account-tree data
///
/// The operator is expected to publish the tree for every committed root.
/// It may not, which is why `withdraw_from_merkle_tree_with_proof` exists.
pub trait MerkleTreeDataSource: Send + Sync {
    fn balance_proof(&self, root: &Hash, account_id: AccountId, token: TokenId)
        -> Option<BalanceProof>;
}

/// Sink for outgoing events
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: ExchangeEvent);
}
