//! Read access to the user directory.

pub mod directory;

pub use directory::DirectoryService;
