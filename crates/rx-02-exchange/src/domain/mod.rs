//! Domain layer for the exchange
//!
//! Pure state and rules, no I/O:
//! - `mode`: the Normal / Shutdown / WithdrawalMode ratchet
//! - `queue`, `deposit_queue`, `withdrawal_queue`: request logs with a head
//! - `ledger`, `block`: batch validation and the Merkle root
//! - `fallback`, `withdrawn_set`: withdrawal-mode claims
//! - `pending_payouts`: block payouts the vault refused, owed until pulled
//! - `registry`: owner to account id
//! - `state`: snapshot type

pub mod block;
pub mod deposit_queue;
pub mod fallback;
pub mod ledger;
pub mod mode;
pub mod pending_payouts;
pub mod queue;
pub mod registry;
pub mod state;
pub mod withdrawal_queue;
pub mod withdrawn_set;

pub use block::{compute_public_input, Block, BlockContext, BlockProof, WithdrawalPayout};
pub use deposit_queue::{DepositQueue, DepositRequest};
pub use fallback::{check_merkle_claim, recipient_for, WithdrawalPath};
pub use ledger::{BatchPlan, BlockLedger, BlockRecord};
pub use mode::{transition, ExchangeMode, ModeChange, ModeController, ModeEvent, ModeInputs};
pub use pending_payouts::PendingPayouts;
pub use queue::{QueuedRequest, RequestQueue};
pub use registry::AccountRegistry;
pub use state::ExchangeState;
pub use withdrawal_queue::{WithdrawalQueue, WithdrawalRequest};
pub use withdrawn_set::WithdrawnSet;
