//! Overwrite mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How existing files on disk are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Never overwrite an existing file (default).
    #[default]
    Skip,
    /// Always overwrite.
    Force,
    /// Prompt before overwriting an existing file.
    Ask,
}

impl fmt::Display for OverwriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverwriteMode::Skip => write!(f, "skip"),
            OverwriteMode::Force => write!(f, "force"),
            OverwriteMode::Ask => write!(f, "ask"),
        }
    }
}

impl FromStr for OverwriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "no" => Ok(OverwriteMode::Skip),
            "force" | "yes" => Ok(OverwriteMode::Force),
            "ask" => Ok(OverwriteMode::Ask),
            _ => Err(format!("Unknown overwrite mode: {}", s)),
        }
    }
}
