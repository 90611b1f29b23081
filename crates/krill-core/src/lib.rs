// crates/krill-core/src/lib.rs
//
// krill-core: Core identity, token-unit, and error types for the
// Krill Protocol.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the account key type, the $KRL unit conventions, and the
// protocol-wide error taxonomy used by the staking ledger.

pub mod error;
pub mod identity;
pub mod units;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use krill_core::AccountId;`

pub use error::LedgerError;
pub use identity::AccountId;
pub use units::{Krl, Plank, PLANK_PER_KRL};
