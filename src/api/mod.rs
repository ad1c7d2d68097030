//! Canvas API module.
//!
//! This module provides:
//! - The `CanvasSource` interface consumed by the traversal
//! - Canvas resource types
//! - REST client with pagination
//! - HTTP fetching with retry and backoff

pub mod client;
pub mod http;
pub mod retry;
pub mod source;
pub mod types;

pub use client::{CanvasApi, PER_PAGE};
pub use http::HttpClient;
pub use retry::RetryConfig;
pub use source::{CanvasSource, FolderOwner};
pub use types::*;
