//! Download discipline.
//!
//! This module provides:
//! - The download policy gating every write
//! - Download tasks
//! - Run statistics

pub mod policy;
pub mod state;
pub mod task;

pub use policy::{Confirm, DownloadPolicy, TerminalConfirm};
pub use state::MirrorStats;
pub use task::DownloadTask;
