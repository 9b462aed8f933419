//! # Integration Flows
//!
//! End-to-end scenarios driving `ExchangeService` through the operator
//! simulator in `crate::harness`.

pub mod withdrawal_mode;
