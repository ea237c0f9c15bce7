//! File domain entities.

pub mod kind;
pub mod model;
pub mod priority;
pub mod status;

pub use kind::FileKind;
pub use model::{CreateFile, File, FileChanges};
pub use priority::Priority;
pub use status::FileStatus;
