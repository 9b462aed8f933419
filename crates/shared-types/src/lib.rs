//! # Shared Types Crate
//!
//! Primitive identifiers used by every rollup-exchange crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Hash`, `Address`, `TokenId` and friends are
//!   defined once here and re-exported.
//! - **Fixed Width**: all identifiers are plain fixed-size arrays or integers
//!   so they hash and serialize deterministically.

pub mod encoding;
pub mod entities;

pub use encoding::*;
pub use entities::*;
