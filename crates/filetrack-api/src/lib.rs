//! # filetrack-api
//!
//! HTTP API layer for FileTrack built on Axum.
//!
//! Provides the REST endpoints under `/api`, the bearer-token extractor,
//! request DTOs with validation, the response envelope and the mapping
//! from [`filetrack_core::AppError`] to HTTP status codes.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
