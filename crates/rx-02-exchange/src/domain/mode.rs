//! Exchange mode state machine
//!
//! The mode is never advanced by a timer. Every entry point evaluates the
//! timing predicates against `now` and the stored request timestamps, and the
//! stored mode is only a cache of that evaluation.
//!
//! State Machine:
//! ```text
//! [NORMAL] ──shutdown (owner)──→ [SHUTDOWN]
//!    │                               │
//!    │ oldest request age             │ now - shutdown_start
//!    │   > max_age_until_withdraw     │   > base + delta * num_accounts
//!    ↓                               ↓
//! [WITHDRAWAL MODE] ←────────────────┘
//!    (terminal)
//! ```
//!
//! No transition ever leads back to `Normal`.

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, ExchangeResult};
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;

/// Exchange mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeMode {
    /// Blocks accepted, deposits and withdrawal requests open
    #[default]
    Normal,
    /// Owner-initiated wind-down; blocks no longer accepted
    Shutdown,
    /// Terminal; only fallback withdrawals are possible
    WithdrawalMode,
}

impl ExchangeMode {
    /// Gauge encoding (0=Normal, 1=Shutdown, 2=WithdrawalMode)
    pub fn as_gauge(&self) -> u8 {
        match self {
            ExchangeMode::Normal => 0,
            ExchangeMode::Shutdown => 1,
            ExchangeMode::WithdrawalMode => 2,
        }
    }
}

impl fmt::Display for ExchangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeMode::Normal => write!(f, "Normal"),
            ExchangeMode::Shutdown => write!(f, "Shutdown"),
            ExchangeMode::WithdrawalMode => write!(f, "WithdrawalMode"),
        }
    }
}

/// Events that drive mode transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeEvent {
    /// Owner called `shutdown`
    ShutdownRequested,
    /// Oldest unprocessed deposit or withdrawal request is past its age bound
    RequestExpired,
    /// Shutdown allowance ran out
    ShutdownExpired,
}

/// The allowed-transition table. Anything not listed is rejected.
pub fn transition(from: ExchangeMode, event: ModeEvent) -> Option<ExchangeMode> {
    match (from, event) {
        (ExchangeMode::Normal, ModeEvent::ShutdownRequested) => Some(ExchangeMode::Shutdown),
        (ExchangeMode::Normal, ModeEvent::RequestExpired) => Some(ExchangeMode::WithdrawalMode),
        (ExchangeMode::Shutdown, ModeEvent::ShutdownExpired) => Some(ExchangeMode::WithdrawalMode),
        _ => None,
    }
}

/// Timestamps the predicates are evaluated against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeInputs {
    pub now: Timestamp,
    /// Timestamp of the deposit request at the queue head
    pub oldest_deposit: Option<Timestamp>,
    /// Timestamp of the withdrawal request at the queue head
    pub oldest_withdrawal: Option<Timestamp>,
    pub num_accounts: u32,
}

/// A persisted mode flip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    pub from: ExchangeMode,
    pub to: ExchangeMode,
    pub reason: ModeEvent,
    pub at: Timestamp,
}

/// Mode controller
///
/// INVARIANT: `mode` only moves along `transition`; once `WithdrawalMode`
/// it never changes again.
#[derive(Clone, Debug)]
pub struct ModeController {
    mode: ExchangeMode,
    shutdown_start: Option<Timestamp>,
    config: ExchangeConfig,
}

impl ModeController {
    pub fn new(config: &ExchangeConfig) -> Self {
        Self {
            mode: ExchangeMode::Normal,
            shutdown_start: None,
            config: config.clone(),
        }
    }

    /// Last persisted mode. May lag behind `effective_mode`.
    pub fn stored_mode(&self) -> ExchangeMode {
        self.mode
    }

    pub fn shutdown_start(&self) -> Option<Timestamp> {
        self.shutdown_start
    }

    /// Deadline after which a shutdown turns into withdrawal mode.
    pub fn shutdown_deadline(&self, num_accounts: u32) -> Option<Timestamp> {
        let allowance = self.config.shutdown_allowance(num_accounts);
        self.shutdown_start
            .map(|start| start.saturating_add(allowance))
    }

    /// Timing event that has fired for the current mode, if any.
    ///
    /// Only the shutdown timer runs while in `Shutdown`.
    pub fn pending_trigger(&self, inputs: &ModeInputs) -> Option<ModeEvent> {
        match self.mode {
            ExchangeMode::Normal => {
                let expired = |ts: Option<Timestamp>| {
                    ts.is_some_and(|ts| {
                        inputs.now.saturating_sub(ts) > self.config.max_age_request_until_withdraw_mode
                    })
                };
                (expired(inputs.oldest_deposit) || expired(inputs.oldest_withdrawal))
                    .then_some(ModeEvent::RequestExpired)
            }
            ExchangeMode::Shutdown => {
                let deadline = self.shutdown_deadline(inputs.num_accounts)?;
                (inputs.now > deadline).then_some(ModeEvent::ShutdownExpired)
            }
            ExchangeMode::WithdrawalMode => None,
        }
    }

    /// Mode re-derived from `inputs` without persisting anything.
    pub fn effective_mode(&self, inputs: &ModeInputs) -> ExchangeMode {
        self.pending_trigger(inputs)
            .and_then(|event| transition(self.mode, event))
            .unwrap_or(self.mode)
    }

    /// Pure withdrawal-mode predicate.
    pub fn is_in_withdrawal_mode(&self, inputs: &ModeInputs) -> bool {
        self.effective_mode(inputs) == ExchangeMode::WithdrawalMode
    }

    /// Persist any timing transition that has fired.
    pub fn sync(&mut self, inputs: &ModeInputs) -> Option<ModeChange> {
        let event = self.pending_trigger(inputs)?;
        self.apply(event, inputs.now).ok()
    }

    /// Owner-initiated shutdown.
    pub fn shutdown(&mut self, now: Timestamp) -> ExchangeResult<ModeChange> {
        self.apply(ModeEvent::ShutdownRequested, now)
    }

    fn apply(&mut self, event: ModeEvent, now: Timestamp) -> ExchangeResult<ModeChange> {
        let from = self.mode;
        let to = transition(from, event).ok_or(ExchangeError::InvalidMode { mode: from })?;

        if event == ModeEvent::ShutdownRequested {
            self.shutdown_start = Some(now);
        }
        self.mode = to;

        Ok(ModeChange {
            from,
            to,
            reason: event,
            at: now,
        })
    }
}
