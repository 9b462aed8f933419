//! Hash-commitment block verifier
//!
//! Stands in for the succinct proof system: a proof is valid when it equals
//! `keccak(PROOF_DOMAIN ‖ public_input)`. Anyone holding the public input can
//! produce one, so this only checks that the operator committed to the exact
//! batch the exchange computed.

use crate::domain::BlockProof;
use crate::ports::outbound::BlockVerifier;
use sha3::{Digest, Keccak256};
use shared_types::Hash;

pub const PROOF_DOMAIN: &[u8] = b"rx-block-proof-v1";

#[derive(Debug, Default, Clone, Copy)]
pub struct DigestBlockVerifier;

impl DigestBlockVerifier {
    /// Proof bytes accepted for `public_input`.
    pub fn prove(public_input: &Hash) -> BlockProof {
        let mut hasher = Keccak256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(public_input);
        BlockProof(hasher.finalize().to_vec())
    }
}

impl BlockVerifier for DigestBlockVerifier {
    fn verify_proof(&self, public_input: &Hash, proof: &BlockProof) -> bool {
        Self::prove(public_input) == *proof
    }
}
