//! Block payouts owed to their recipients.
//!
//! A payout belongs to the block that lists it, so it is settled when the
//! batch commits. If the vault refuses the transfer, the amount stays in
//! custody and is owed here until the recipient pulls it.

use shared_types::{Address, TokenId, U256};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingPayouts {
    owed: BTreeMap<(Address, TokenId), U256>,
    /// Sum of `owed` per token, reserved out of custody
    totals: BTreeMap<TokenId, U256>,
}

impl PendingPayouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owed(&self, recipient: &Address, token: TokenId) -> U256 {
        self.owed
            .get(&(*recipient, token))
            .copied()
            .unwrap_or_default()
    }

    /// Total owed in `token` across all recipients.
    pub fn total(&self, token: TokenId) -> U256 {
        self.totals.get(&token).copied().unwrap_or_default()
    }

    /// Owe `amount` more to `recipient`.
    ///
    /// Credits are bounded by custody, so the sums cannot overflow.
    pub fn credit(&mut self, recipient: Address, token: TokenId, amount: U256) {
        let owed = self.owed.entry((recipient, token)).or_default();
        *owed = owed.saturating_add(amount);
        let total = self.totals.entry(token).or_default();
        *total = total.saturating_add(amount);
    }

    /// Clear what is owed to `recipient` and return it.
    pub fn settle(&mut self, recipient: &Address, token: TokenId) -> U256 {
        let amount = self.owed.remove(&(*recipient, token)).unwrap_or_default();
        if let Some(total) = self.totals.get_mut(&token) {
            *total = total.saturating_sub(amount);
        }
        amount
    }

    pub fn is_empty(&self) -> bool {
        self.owed.is_empty()
    }
}
