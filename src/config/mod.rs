//! Configuration module for canvas-mirror.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Overwrite mode definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{normalize_base_url, CanvasConfig, Config, OptionsConfig};
pub use modes::OverwriteMode;
pub use validation::validate_config;
