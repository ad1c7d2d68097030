//! The download policy: the single gate in front of every write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::config::OverwriteMode;
use crate::download::state::MirrorStats;
use crate::error::Result;
use crate::fs::ensure_parent;

/// Asks the user whether an existing file may be overwritten.
///
/// Implementations may block; the policy keeps them off the async workers.
pub trait Confirm: Send + Sync {
    fn confirm(&self, path: &Path) -> bool;
}

/// Interactive confirmation on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, path: &Path) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(format!("{} already exists, overwrite?", path.display()))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Decides whether a destination may be written.
///
/// Repeated runs in [`OverwriteMode::Skip`] are no-ops on paths that already
/// exist. In [`OverwriteMode::Ask`] each existing path is prompted for once
/// per run. Branches waiting for the prompt yield instead of blocking their
/// worker thread.
pub struct DownloadPolicy {
    mode: OverwriteMode,
    prompter: Box<dyn Confirm>,
    answers: Mutex<HashMap<PathBuf, bool>>,
    prompt_turn: tokio::sync::Mutex<()>,
    stats: Arc<MirrorStats>,
}

impl DownloadPolicy {
    pub fn new(mode: OverwriteMode, stats: Arc<MirrorStats>) -> Self {
        Self::with_prompter(mode, Box::new(TerminalConfirm), stats)
    }

    pub fn with_prompter(
        mode: OverwriteMode,
        prompter: Box<dyn Confirm>,
        stats: Arc<MirrorStats>,
    ) -> Self {
        Self {
            mode,
            prompter,
            answers: Mutex::new(HashMap::new()),
            prompt_turn: tokio::sync::Mutex::new(()),
            stats,
        }
    }

    pub fn mode(&self) -> OverwriteMode {
        self.mode
    }

    /// Whether `path` may be written. On approval the parent directory exists.
    pub async fn should_write(&self, path: &Path) -> Result<bool> {
        let approved = if !path.exists() {
            true
        } else {
            match self.mode {
                OverwriteMode::Force => true,
                OverwriteMode::Skip => false,
                OverwriteMode::Ask => self.ask(path).await,
            }
        };

        if !approved {
            tracing::debug!("Skipping file {}", path.display());
            self.stats.record_skipped();
            return Ok(false);
        }

        ensure_parent(path)?;
        Ok(true)
    }

    async fn ask(&self, path: &Path) -> bool {
        let cached = self.answers.lock().get(path).copied();
        if let Some(answer) = cached {
            return answer;
        }

        let _turn = self.prompt_turn.lock().await;
        // another branch may have asked while we waited
        let cached = self.answers.lock().get(path).copied();
        if let Some(answer) = cached {
            return answer;
        }

        let answer = self.prompt(path);
        self.answers.lock().insert(path.to_path_buf(), answer);
        answer
    }

    fn prompt(&self, path: &Path) -> bool {
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => {
                tokio::task::block_in_place(|| self.prompter.confirm(path))
            }
            _ => self.prompter.confirm(path),
        }
    }
}
