//! Account registry
//!
//! Assigns dense account ids to owners on first deposit. Slot 0 belongs to
//! the protocol fee account, owned by the zero address.

use crate::error::{ExchangeError, ExchangeResult};
use rx_01_account_tree::ACCOUNT_TREE_DEPTH;
use shared_types::{AccountId, Address, PROTOCOL_FEE_ACCOUNT_ID, ZERO_ADDRESS};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct AccountRegistry {
    ids: HashMap<Address, AccountId>,
    owners: Vec<Address>,
}

impl AccountRegistry {
    /// Registry holding only the protocol fee account.
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(ZERO_ADDRESS, PROTOCOL_FEE_ACCOUNT_ID);
        Self {
            ids,
            owners: vec![ZERO_ADDRESS],
        }
    }

    pub fn capacity() -> u64 {
        1u64 << ACCOUNT_TREE_DEPTH
    }

    /// Registered accounts, fee account included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.owners.len() as u32
    }

    pub fn get(&self, owner: &Address) -> Option<AccountId> {
        self.ids.get(owner).copied()
    }

    pub fn owner_of(&self, account_id: AccountId) -> Option<Address> {
        self.owners.get(account_id as usize).copied()
    }

    /// Id that `register` would return, without registering.
    pub fn resolve(&self, owner: &Address) -> ExchangeResult<(AccountId, bool)> {
        if let Some(id) = self.get(owner) {
            return Ok((id, false));
        }
        let next = self.owners.len() as u64;
        if next >= Self::capacity() {
            return Err(ExchangeError::TooManyAccounts {
                capacity: Self::capacity(),
            });
        }
        Ok((next as AccountId, true))
    }

    /// Id of `owner`, creating the account if needed. The flag is `true`
    /// when the account is new.
    pub fn register(&mut self, owner: Address) -> ExchangeResult<(AccountId, bool)> {
        let (id, created) = self.resolve(&owner)?;
        if created {
            self.ids.insert(owner, id);
            self.owners.push(owner);
        }
        Ok((id, created))
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}
