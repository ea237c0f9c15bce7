//! File kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// Whether a file is a paper document or an electronic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_kind")]
pub enum FileKind {
    #[sqlx(rename = "Physical")]
    Physical,
    #[sqlx(rename = "Digital")]
    Digital,
}

impl FileKind {
    /// Map the `isDigital` flag used by file creation.
    pub fn from_digital(is_digital: bool) -> Self {
        if is_digital { Self::Digital } else { Self::Physical }
    }

    /// Return the kind as a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Digital => "Digital",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Physical" => Ok(Self::Physical),
            "Digital" => Ok(Self::Digital),
            _ => Err(AppError::invalid_field(
                "type",
                format!("Invalid file type: '{s}'. Expected one of: Physical, Digital"),
            )),
        }
    }
}
