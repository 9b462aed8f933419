//! # Core Identifiers
//!
//! Type aliases shared between the account tree, the exchange and tests.

use serde::{Deserialize, Serialize};

// Re-export U256 from primitive-types for balances and amounts
pub use primitive_types::U256;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// A 32-byte field element (EdDSA public key coordinate).
pub type FieldElement = [u8; 32];

/// Token identifier inside the exchange.
pub type TokenId = u16;

/// Dense account slot in the account tree.
pub type AccountId = u32;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// The zero address. Owner of the protocol fee account.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// All-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Account slot reserved for the protocol fee account.
pub const PROTOCOL_FEE_ACCOUNT_ID: AccountId = 0;

/// EdDSA public key of an account, stored as two field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PublicKey {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl PublicKey {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// The unset key every fresh account starts with.
    pub fn is_zero(&self) -> bool {
        self.x == [0u8; 32] && self.y == [0u8; 32]
    }
}

/// Check whether an address is the zero address.
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}
