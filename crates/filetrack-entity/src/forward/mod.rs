//! Forward domain entities.

pub mod model;
pub mod status;

pub use model::{Forward, ForwardChanges, NewForward};
pub use status::ForwardStatus;
