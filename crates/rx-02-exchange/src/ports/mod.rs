//! Ports module for the exchange

pub mod inbound;
pub mod outbound;

pub use inbound::{BatchReceipt, ExchangeApi};
pub use outbound::{BlockVerifier, EventPublisher, MerkleTreeDataSource, TimeSource, TokenVault};
