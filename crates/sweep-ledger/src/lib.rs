//! Sweep ledger client facade.
//!
//! The remote ledger network is an external collaborator; this crate defines
//! its boundary (anchor, balance, fee, broadcast), the error taxonomy with
//! the built-in transient classifier, and an in-memory adapter for tests and
//! rehearsals.

pub mod adapters;
pub mod error;
pub mod traits;
pub mod types;

pub use adapters::mock::MockLedger;
pub use error::{is_transient, LedgerError};
pub use traits::ILedgerClient;
pub use types::{AnchorToken, TransferDraft};
