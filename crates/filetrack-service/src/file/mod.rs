//! File records: creation, maintenance and role-scoped queries.

pub mod query;
pub mod service;

pub use query::{FileQuery, FileQueryService};
pub use service::{CreateFileInput, FileService, UpdateFileInput};
