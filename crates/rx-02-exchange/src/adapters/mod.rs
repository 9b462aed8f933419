//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound ports. The in-memory adapters
//! double as the test doubles used across the workspace.

mod clock;
mod event_log;
mod tree_data;
mod vault;
mod verifier;

pub use clock::{ManualClock, SystemTimeSource};
pub use event_log::{InMemoryEventLog, TracingEventPublisher};
pub use tree_data::SnapshotTreeDataSource;
pub use vault::InMemoryTokenVault;
pub use verifier::{DigestBlockVerifier, PROOF_DOMAIN};
