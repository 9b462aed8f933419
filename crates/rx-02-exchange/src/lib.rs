//! # rx-02-exchange
//!
//! Custody side of a rollup exchange. It holds user funds, queues on-chain
//! deposit and withdrawal requests, and accepts proven blocks that advance
//! the committed account-tree root. If the operator stops processing
//! requests, or the owner shuts the exchange down, it falls back to letting
//! users pull funds out directly.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Request queues**: deposits and on-chain withdrawal requests, folded in
//!   order by committed blocks
//! - **Block processing**: per-block public input, proof check, forced
//!   request deadline, custody-checked payouts
//! - **Lazy mode ratchet**: Normal, Shutdown and WithdrawalMode, evaluated
//!   from the clock on every call
//! - **Withdrawal fallback**: three exit paths with replay protection
//!
//! ## Mode Ratchet
//!
//! ```text
//! [NORMAL] ──shutdown (owner)──→ [SHUTDOWN] ──base + delta*accounts elapsed──→ [WITHDRAWAL MODE]
//!     │                                                                               ↑
//!     └──────────────── oldest pending request older than max age ────────────────────┘
//! ```
//!
//! There is no way back. A mutating call persists a fired transition before
//! it checks anything else, so the flip sticks even if the call is rejected.
//!
//! ## Withdrawal Paths
//!
//! | Path | Pays | Replay ledger |
//! |------|------|---------------|
//! | `withdraw_from_deposit_request` | unfolded deposit amount | deposit `withdrawn` flag |
//! | `withdraw_from_merkle_tree` | committed balance, published proof | `WithdrawnSet` |
//! | `withdraw_from_merkle_tree_with_proof` | committed balance, caller proof | `WithdrawnSet` |
//! | `withdraw_pending_payout` (any mode) | block payout the vault refused | `PendingPayouts` |
//!
//! Proceeds of the protocol fee account (id 0) go to the protocol fee vault.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rx_02_exchange::{ExchangeConfig, ExchangeService, ExchangeApi};
//!
//! let service = ExchangeService::new(config, clock, verifier, vault, tree_data, events)?;
//!
//! let index = service.deposit(alice, token, amount)?;
//! service.submit_blocks(blocks, operator)?;
//!
//! if service.is_in_withdrawal_mode() {
//!     service.withdraw_from_merkle_tree(alice, token)?;
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::ExchangeConfig;
pub use domain::{
    compute_public_input, Block, BlockContext, BlockProof, BlockRecord, DepositRequest,
    ExchangeMode, ExchangeState, ModeEvent, WithdrawalPath, WithdrawalPayout, WithdrawalRequest,
};
pub use error::{ErrorCategory, ExchangeError, ExchangeResult};
pub use events::ExchangeEvent;
pub use ports::inbound::{BatchReceipt, ExchangeApi};
pub use ports::outbound::{
    BlockVerifier, EventPublisher, MerkleTreeDataSource, TimeSource, TokenVault,
};
pub use service::ExchangeService;
