//! Writes: documents, metadata, downloads and the assets documents link to.

use std::path::Path;

use serde::Serialize;
use tokio::fs;

use crate::context::ContextStack;
use crate::download::DownloadTask;
use crate::error::{Error, Result};
use crate::extract::{scan_document, Converter};
use crate::fs::filename_or;
use crate::traverse::engine::Mirror;

impl Mirror {
    /// Write `contents` to `path` if the download policy allows it.
    pub(crate) async fn write_file(
        &self,
        stack: &ContextStack,
        path: &Path,
        contents: impl AsRef<[u8]>,
    ) -> Result<bool> {
        if !self.policy.should_write(path).await? {
            return Ok(false);
        }
        fs::write(path, contents).await?;
        tracing::info!(scope = %stack.current_scope(), "{} downloaded", path.display());
        self.stats.record_written();
        Ok(true)
    }

    /// Persist a resource as pretty-printed JSON in the current directory.
    pub(crate) async fn write_metadata<T: Serialize>(
        &self,
        stack: &ContextStack,
        filename: &str,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let path = stack.current_path().join(filename);
        self.write_file(stack, &path, json).await?;
        Ok(())
    }

    /// Persist an HTML document as `<stem>.html`, then its Markdown sibling
    /// and the assets it links to.
    ///
    /// Follow-ups work from the copy on disk, so a document kept from an
    /// earlier run still gets its assets checked.
    pub(crate) async fn save_document(&self, stack: &ContextStack, stem: &str, html: &str) -> Result<()> {
        let dir = stack.current_path();
        let html_path = dir.join(format!("{}.html", stem));

        self.write_file(stack, &html_path, html).await?;
        if !html_path.is_file() {
            return Ok(());
        }
        let stored = fs::read_to_string(&html_path).await?;

        if self.options.markdown {
            let md_path = dir.join(format!("{}.md", stem));
            if self.policy.should_write(&md_path).await? {
                tracing::info!(
                    scope = %stack.current_scope(),
                    "Converting {} to markdown",
                    html_path.display()
                );
                fs::write(&md_path, self.converter.to_markdown(&stored)).await?;
                self.stats.record_written();
            }
        }

        self.download_assets(stack, &stored).await;
        Ok(())
    }

    /// Download the files and videos a document links to, relative to the
    /// current directory.
    pub(crate) async fn download_assets(&self, stack: &ContextStack, html: &str) {
        let assets = scan_document(html);
        if assets.is_empty() {
            return;
        }
        tracing::info!(scope = %stack.current_scope(), "Downloading page data");

        let dir = stack.current_path();
        for (i, link) in assets.files.into_iter().enumerate() {
            let destination = dir
                .join("files")
                .join(filename_or(&link.title, &format!("file_{}", i)));
            self.run_task(stack, DownloadTask::new(link.href, destination))
                .await;
        }

        if !self.options.videos {
            return;
        }
        for (n, embed_url) in assets.videos.iter().enumerate() {
            let destination = dir.join("videos").join(format!("{}.mp4", n));
            self.download_video(stack, embed_url, &destination).await;
        }
    }

    /// Download a single file. Failures are logged and counted, never returned,
    /// and leave any earlier copy at the destination in place.
    pub(crate) async fn run_task(&self, stack: &ContextStack, task: DownloadTask) {
        match self.policy.should_write(&task.destination).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::error!(scope = %stack.current_scope(), "Cannot write {}: {}", task.destination.display(), e);
                self.stats.record_failed();
                return;
            }
        }

        tracing::info!(scope = %stack.current_scope(), "Downloading {}", task.destination.display());
        match self
            .http
            .download_to(&task.source_url, &task.destination, self.options.show_progress)
            .await
        {
            Ok(bytes) => {
                tracing::info!(
                    scope = %stack.current_scope(),
                    "{} downloaded ({} bytes)",
                    task.destination.display(),
                    bytes
                );
                self.stats.record_written();
            }
            Err(e) => {
                tracing::error!(
                    scope = %stack.current_scope(),
                    "File download failed for {}: {}",
                    task.source_url,
                    e
                );
                self.stats.record_failed();
            }
        }
    }

    async fn download_video(&self, stack: &ContextStack, embed_url: &str, destination: &Path) {
        match self.policy.should_write(destination).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::error!(scope = %stack.current_scope(), "Cannot write {}: {}", destination.display(), e);
                self.stats.record_failed();
                return;
            }
        }

        match self.videos.reconstruct(embed_url, destination).await {
            Ok(bytes) => {
                tracing::info!(
                    scope = %stack.current_scope(),
                    "Downloaded {} successfully ({} bytes)",
                    destination.display(),
                    bytes
                );
                self.stats.record_written();
                self.stats.record_video();
            }
            Err(e @ Error::MalformedUpstream(_)) => {
                self.warn(stack, format_args!("Video {} skipped: {}", embed_url, e));
            }
            Err(e) => {
                tracing::error!(scope = %stack.current_scope(), "Video download failed for {}: {}", embed_url, e);
                self.stats.record_failed();
            }
        }
    }
}
