//! # Exchange Metrics
//!
//! Prometheus metrics for the exchange.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! rx-02-exchange = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `exchange_deposits_total` - Counter of queued deposits
//! - `exchange_withdrawal_requests_total` - Counter of queued on-chain withdrawal requests
//! - `exchange_blocks_committed_total` - Counter of committed blocks
//! - `exchange_rejections_total` - Counter of rejected calls (by reason code)
//! - `exchange_fallback_withdrawals_total` - Counter of withdrawal-mode payouts (by path)
//! - `exchange_payouts_deferred_total` - Counter of block payouts the vault refused
//! - `exchange_mode` - Gauge of the stored mode (0=Normal, 1=Shutdown, 2=WithdrawalMode)
//! - `exchange_pending_requests` - Gauge of unprocessed requests (by queue)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_gauge_vec, register_int_counter, register_int_counter_vec, Gauge,
    GaugeVec, IntCounter, IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total deposits queued
    pub static ref DEPOSITS: IntCounter = register_int_counter!(
        "exchange_deposits_total",
        "Total number of deposit requests queued"
    )
    .expect("Failed to create DEPOSITS metric");

    /// Total on-chain withdrawal requests queued
    pub static ref WITHDRAWAL_REQUESTS: IntCounter = register_int_counter!(
        "exchange_withdrawal_requests_total",
        "Total number of on-chain withdrawal requests queued"
    )
    .expect("Failed to create WITHDRAWAL_REQUESTS metric");

    /// Total blocks committed
    pub static ref BLOCKS_COMMITTED: IntCounter = register_int_counter!(
        "exchange_blocks_committed_total",
        "Total number of blocks committed"
    )
    .expect("Failed to create BLOCKS_COMMITTED metric");

    /// Rejected calls, labeled by reason code
    pub static ref REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "exchange_rejections_total",
        "Total number of rejected calls",
        &["reason"]
    )
    .expect("Failed to create REJECTIONS metric");

    /// Withdrawal-mode payouts, labeled by path
    pub static ref FALLBACK_WITHDRAWALS: IntCounterVec = register_int_counter_vec!(
        "exchange_fallback_withdrawals_total",
        "Total number of withdrawal-mode payouts",
        &["path"]
    )
    .expect("Failed to create FALLBACK_WITHDRAWALS metric");

    /// Block payouts left owed after a refused transfer
    pub static ref PAYOUTS_DEFERRED: IntCounter = register_int_counter!(
        "exchange_payouts_deferred_total",
        "Total number of block payouts the vault refused"
    )
    .expect("Failed to create PAYOUTS_DEFERRED metric");

    /// Stored mode (0=Normal, 1=Shutdown, 2=WithdrawalMode)
    pub static ref MODE: Gauge = register_gauge!(
        "exchange_mode",
        "Stored exchange mode (0=Normal, 1=Shutdown, 2=WithdrawalMode)"
    )
    .expect("Failed to create MODE metric");

    /// Unprocessed requests, labeled by queue
    pub static ref PENDING_REQUESTS: GaugeVec = register_gauge_vec!(
        "exchange_pending_requests",
        "Requests not yet folded into a block",
        &["queue"]
    )
    .expect("Failed to create PENDING_REQUESTS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

#[cfg(feature = "metrics")]
pub fn record_deposit() {
    DEPOSITS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_withdrawal_request() {
    WITHDRAWAL_REQUESTS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_blocks_committed(count: u64) {
    BLOCKS_COMMITTED.inc_by(count);
}

/// Record a rejected call with its reason code
#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    REJECTIONS.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_fallback_withdrawal(path: &str) {
    FALLBACK_WITHDRAWALS.with_label_values(&[path]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_payout_deferred() {
    PAYOUTS_DEFERRED.inc();
}

#[cfg(feature = "metrics")]
pub fn set_mode(mode: u8) {
    MODE.set(mode as f64);
}

#[cfg(feature = "metrics")]
pub fn set_pending_requests(deposits: u64, withdrawals: u64) {
    PENDING_REQUESTS
        .with_label_values(&["deposit"])
        .set(deposits as f64);
    PENDING_REQUESTS
        .with_label_values(&["withdrawal"])
        .set(withdrawals as f64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_deposit() {}

#[cfg(not(feature = "metrics"))]
pub fn record_withdrawal_request() {}

#[cfg(not(feature = "metrics"))]
pub fn record_blocks_committed(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_fallback_withdrawal(_path: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_payout_deferred() {}

#[cfg(not(feature = "metrics"))]
pub fn set_mode(_mode: u8) {}

#[cfg(not(feature = "metrics"))]
pub fn set_pending_requests(_deposits: u64, _withdrawals: u64) {}
