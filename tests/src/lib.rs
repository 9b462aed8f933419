//! # Rollup Exchange Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Operator simulator around ExchangeService
//! │
//! ├── exploits/         # Attack simulations
//! │   ├── replay.rs     # Double withdrawals across paths
//! │   └── operator.rs   # Withheld data, stalling, unbacked payouts
//! │
//! └── integration/      # Cross-crate flows
//!     ├── block_flow.rs
//!     └── withdrawal_mode.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rx-tests
//!
//! # By category
//! cargo test -p rx-tests integration::
//! cargo test -p rx-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p rx-tests
//! ```

pub mod exploits;
pub mod integration;
