//! Configuration structures and loading logic.

use crate::config::modes::OverwriteMode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Platform connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas host or base URL (`https://` is prepended when missing).
    #[serde(default)]
    pub base_url: String,

    /// Canvas API access token.
    #[serde(default)]
    pub access_token: String,
}

/// Mirroring options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Root directory of the mirror.
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// What to do with files that already exist.
    #[serde(default)]
    pub overwrite: OverwriteMode,

    /// Whether to reconstruct embedded Kaltura videos.
    #[serde(default = "default_true")]
    pub videos: bool,

    /// Whether to convert saved HTML documents to markdown.
    #[serde(default = "default_true")]
    pub markdown: bool,

    /// Number of courses visited concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Number of video segments fetched concurrently.
    #[serde(default = "default_segment_concurrency")]
    pub segment_concurrency: usize,

    /// Kaltura `flavorParamsId` of the rendition to reconstruct.
    #[serde(default = "default_quality_param_id")]
    pub quality_param_id: i64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Retry attempts for transport failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Whether to show progress bars for large downloads.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            destination: None,
            overwrite: OverwriteMode::default(),
            videos: true,
            markdown: true,
            concurrency: default_concurrency(),
            segment_concurrency: default_segment_concurrency(),
            quality_param_id: default_quality_param_id(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            show_progress: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

fn default_segment_concurrency() -> usize {
    4
}

fn default_quality_param_id() -> i64 {
    crate::video::kaltura::SOURCE_QUALITY_PARAM_ID
}

fn default_request_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective mirror root.
    pub fn destination(&self) -> PathBuf {
        self.options
            .destination
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the platform base URL with a scheme.
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.canvas.base_url)
    }
}

/// Prepend `https://` to a bare host and drop trailing slashes.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [canvas]
            base_url = "canvas.example.edu"
            access_token = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.options.overwrite, OverwriteMode::Skip);
        assert!(config.options.videos);
        assert!(config.options.markdown);
        assert_eq!(config.options.quality_param_id, 5);
        assert_eq!(config.base_url(), "https://canvas.example.edu");
    }

    #[test]
    fn test_parse_options() {
        let config: Config = toml::from_str(
            r#"
            [canvas]
            base_url = "http://localhost:8080/"
            access_token = "abc"

            [options]
            destination = "/tmp/mirror"
            overwrite = "force"
            videos = false
            concurrency = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.options.overwrite, OverwriteMode::Force);
        assert!(!config.options.videos);
        assert_eq!(config.options.concurrency, 3);
        assert_eq!(config.destination(), PathBuf::from("/tmp/mirror"));
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.canvas.base_url = "canvas.example.edu".into();
        config.options.overwrite = OverwriteMode::Ask;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.canvas.base_url, "canvas.example.edu");
        assert_eq!(loaded.options.overwrite, OverwriteMode::Ask);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
