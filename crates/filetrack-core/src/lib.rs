//! # filetrack-core
//!
//! Core crate for FileTrack. Contains the unified error system,
//! configuration schemas, and pagination types shared by every other crate.
//!
//! This crate has **no** internal dependencies on other FileTrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
