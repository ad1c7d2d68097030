//! Canvas Mirror - offline copies of Canvas LMS courses
//!
//! This library walks the course tree of a Canvas account and mirrors it to a
//! local directory, one directory per course, module, item, group and folder.
//!
//! # Features
//!
//! - Front pages, pages, assignments and quizzes as HTML, Markdown and JSON
//! - Current user's submissions and their attachments
//! - Course and group file trees
//! - Course media objects
//! - Files linked from saved documents
//! - Embedded Kaltura video reconstruction
//! - Skip, force and ask overwrite modes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use canvas_mirror::{CanvasApi, CanvasSource, Config, DownloadPolicy, HttpClient, Mirror,
//!     MirrorOptions, MirrorStats, RetryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let http = HttpClient::new(Duration::from_secs(60), RetryConfig::default())?
//!         .with_bearer(&config.base_url(), &config.canvas.access_token)?;
//!     let api = Arc::new(CanvasApi::new(&config.base_url(), http.clone()));
//!
//!     let user = api.current_user().await?;
//!     let courses = api.courses().await?;
//!
//!     let stats = Arc::new(MirrorStats::new());
//!     let policy = Arc::new(DownloadPolicy::new(config.options.overwrite, stats.clone()));
//!     let mirror = Mirror::new(api, http, policy, stats, MirrorOptions::from_config(&config),
//!         config.destination(), user.id);
//!     mirror.run(courses).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod extract;
pub mod fs;
pub mod output;
pub mod traverse;
pub mod video;

// Re-exports for convenience
pub use api::{CanvasApi, CanvasSource, HttpClient, RetryConfig};
pub use config::{Config, OverwriteMode};
pub use context::ContextStack;
pub use download::{DownloadPolicy, MirrorStats};
pub use error::{Error, Result};
pub use traverse::{Mirror, MirrorOptions};
