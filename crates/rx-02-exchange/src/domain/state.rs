//! Point-in-time view of the exchange
//!
//! Timing fields are `None` when there is nothing to time.

use super::mode::ExchangeMode;
use serde::{Deserialize, Serialize};
use shared_types::{Hash, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeState {
    /// Re-derived at snapshot time, not the stored cache
    pub mode: ExchangeMode,
    pub merkle_root: Hash,
    pub num_blocks_processed: u64,
    pub oldest_unprocessed_deposit_timestamp: Option<Timestamp>,
    pub oldest_unprocessed_withdrawal_timestamp: Option<Timestamp>,
    pub shutdown_start_time: Option<Timestamp>,
    pub num_accounts: u32,
}
