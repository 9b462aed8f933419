//! In-memory token custody

use crate::error::{ExchangeError, ExchangeResult};
use crate::ports::outbound::TokenVault;
use parking_lot::RwLock;
use shared_types::{Address, TokenId, U256};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct VaultState {
    custody: HashMap<TokenId, U256>,
    /// Funds released to each recipient, i.e. their balance outside the exchange
    released: HashMap<(Address, TokenId), U256>,
}

/// Token vault that tracks custody and released funds in memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenVault {
    state: RwLock<VaultState>,
}

impl InMemoryTokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total released to `holder` in `token`.
    pub fn balance_of(&self, holder: &Address, token: TokenId) -> U256 {
        self.state
            .read()
            .released
            .get(&(*holder, token))
            .copied()
            .unwrap_or_default()
    }
}

impl TokenVault for InMemoryTokenVault {
    fn deposit(&self, _from: &Address, token: TokenId, amount: U256) -> ExchangeResult<()> {
        let mut state = self.state.write();
        let custody = state.custody.entry(token).or_default();
        *custody = custody
            .checked_add(amount)
            .ok_or(ExchangeError::AmountOverflow { token })?;
        Ok(())
    }

    fn release(&self, to: &Address, token: TokenId, amount: U256) -> ExchangeResult<()> {
        let mut state = self.state.write();
        let available = state.custody.get(&token).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientCustody {
                token,
                available,
                required: amount,
            })?;

        state.custody.insert(token, remaining);
        let balance = state.released.entry((*to, token)).or_default();
        *balance = balance.saturating_add(amount);
        debug!(token, amount = %amount, "released from custody");
        Ok(())
    }

    fn custody(&self, token: TokenId) -> U256 {
        self.state
            .read()
            .custody
            .get(&token)
            .copied()
            .unwrap_or_default()
    }
}
