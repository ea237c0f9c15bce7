//! The forwarding workflow and its read side.

pub mod engine;
pub mod notices;
pub mod query;

pub use engine::{CreateForwardInput, Outcome, UpdateForwardInput, WorkflowEngine};
pub use query::{DepartmentForwardStats, ForwardQuery, ForwardQueryService};
