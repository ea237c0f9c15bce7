//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use filetrack_auth::JwtDecoder;
use filetrack_core::config::AppConfig;
use filetrack_service::Services;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Bearer token validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Every business service
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(config: AppConfig, services: Services) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        Self {
            config: Arc::new(config),
            jwt_decoder,
            services: Arc::new(services),
        }
    }
}
