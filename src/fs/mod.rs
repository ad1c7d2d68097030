//! Filesystem module.
//!
//! Provides:
//! - Directory management
//! - Filename sanitization

pub mod naming;
pub mod paths;

pub use naming::{filename_or, sanitize_path_component};
pub use paths::{ensure_dir, ensure_parent};
