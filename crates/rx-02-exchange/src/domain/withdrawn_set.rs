//! Ledger of committed balances already paid out in withdrawal mode.
//!
//! Keyed by the tree leaf identity `(account_id, token)`, so the proof-based
//! and data-source-based paths share one entry per balance. Never cleared.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, TokenId};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawnSet {
    entries: BTreeSet<(AccountId, TokenId)>,
}

impl WithdrawnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, account_id: AccountId, token: TokenId) -> bool {
        self.entries.contains(&(account_id, token))
    }

    /// Record a withdrawal. Returns `false` if it was already recorded.
    pub fn insert(&mut self, account_id: AccountId, token: TokenId) -> bool {
        self.entries.insert((account_id, token))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
