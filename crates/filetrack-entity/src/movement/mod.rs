//! Movement (audit trail) entities.

pub mod action;
pub mod model;

pub use action::MovementAction;
pub use model::{Movement, MovementCorrection, NewMovement};
