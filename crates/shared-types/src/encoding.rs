//! # Encoding Helpers
//!
//! Canonical byte encodings used when hashing, plus short hex forms for logs.

use crate::entities::{Address, Hash, U256};

/// Big-endian 32-byte encoding of a U256.
pub fn u256_to_be_bytes(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Decode a big-endian 32-byte word into a U256.
pub fn u256_from_be_bytes(bytes: &[u8; 32]) -> U256 {
    U256::from_big_endian(bytes)
}

/// `0x`-prefixed hex of an address.
pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parse a 20-byte address from hex, with or without the `0x` prefix.
pub fn parse_address(text: &str) -> Option<Address> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

/// First four bytes of a hash in hex, for log lines.
pub fn short_hash(hash: &Hash) -> String {
    format!("0x{}…", hex::encode(&hash[..4]))
}
