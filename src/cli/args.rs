//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, OverwriteMode};

/// Canvas LMS course mirroring CLI.
#[derive(Parser, Debug)]
#[command(
    name = "canvas-mirror",
    version,
    about = "Mirror Canvas LMS courses to a local directory",
    long_about = "A CLI tool to mirror the courses of a Canvas LMS account to disk.\n\n\
                  Saves front pages, module items, assignments, quizzes, submissions, \
                  group and course files, course media and embedded Kaltura videos."
)]
pub struct Args {
    /// Canvas host or base URL.
    #[arg(short = 'u', long = "url", env = "CANVAS_BASE_URL")]
    pub base_url: Option<String>,

    /// Canvas API access token.
    #[arg(short, long, env = "CANVAS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root directory of the mirror.
    #[arg(short = 'd', long = "directory")]
    pub destination: Option<PathBuf>,

    /// What to do with files that already exist.
    #[arg(short, long, value_enum)]
    pub overwrite: Option<OverwriteArg>,

    /// Don't reconstruct embedded videos.
    #[arg(long)]
    pub no_videos: bool,

    /// Don't convert saved documents to markdown.
    #[arg(long)]
    pub no_markdown: bool,

    /// Number of courses mirrored concurrently.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Number of video segments fetched concurrently.
    #[arg(long)]
    pub segment_concurrency: Option<usize>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Write the merged settings back to the configuration file.
    #[arg(long)]
    pub save_config: bool,

    /// Hide progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI overwrite mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OverwriteArg {
    /// Keep existing files.
    Skip,
    /// Overwrite existing files.
    Force,
    /// Ask before overwriting each existing file.
    Ask,
}

impl From<OverwriteArg> for OverwriteMode {
    fn from(arg: OverwriteArg) -> Self {
        match arg {
            OverwriteArg::Skip => OverwriteMode::Skip,
            OverwriteArg::Force => OverwriteMode::Force,
            OverwriteArg::Ask => OverwriteMode::Ask,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.canvas.base_url = base_url.clone();
        }

        if let Some(token) = &self.token {
            config.canvas.access_token = token.clone();
        }

        if let Some(dir) = &self.destination {
            config.options.destination = Some(dir.clone());
        }

        if let Some(mode) = self.overwrite {
            config.options.overwrite = mode.into();
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrency = concurrency;
        }

        if let Some(concurrency) = self.segment_concurrency {
            config.options.segment_concurrency = concurrency;
        }

        // Boolean flags (only override if set to non-default)
        if self.no_videos {
            config.options.videos = false;
        }

        if self.no_markdown {
            config.options.markdown = false;
        }

        if self.quiet {
            config.options.show_progress = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "canvas-mirror",
            "--url",
            "canvas.example.edu",
            "--overwrite",
            "force",
            "--no-videos",
            "--concurrency",
            "3",
            "-d",
            "/tmp/mirror",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.canvas.base_url, "canvas.example.edu");
        assert_eq!(config.options.overwrite, OverwriteMode::Force);
        assert!(!config.options.videos);
        assert!(config.options.markdown);
        assert_eq!(config.options.concurrency, 3);
        assert_eq!(config.options.destination, Some(PathBuf::from("/tmp/mirror")));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::parse_from(["canvas-mirror"]);
        let mut config = Config::default();
        config.options.overwrite = OverwriteMode::Ask;
        args.merge_into_config(&mut config);

        assert_eq!(config.options.overwrite, OverwriteMode::Ask);
        assert!(config.options.videos);
    }
}
