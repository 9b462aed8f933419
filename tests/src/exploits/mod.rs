//! # Exploit Simulations
//!
//! Attacks a malicious user or operator could try against the exchange.
//!
//! - `replay`: withdrawing the same funds twice, across paths
//! - `operator`: withholding tree data, stalling, forging batches

pub mod operator;
pub mod replay;
