//! Movement ledger: the audit trail of every file event.

pub mod ledger;

pub use ledger::{AddMovement, MovementLedger};
