//! Forwarding workflow configuration.

use serde::{Deserialize, Serialize};

/// Workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Prefix of generated file codes (`{prefix}-F-{year}-{seq}`).
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            code_prefix: default_code_prefix(),
        }
    }
}

fn default_code_prefix() -> String {
    "THDC".to_string()
}
