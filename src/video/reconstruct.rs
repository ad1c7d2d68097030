//! Video reconstruction from an embedded player.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::api::HttpClient;
use crate::error::{Error, Result};
use crate::output::create_item_bar;
use crate::video::kaltura::{self, VideoVariant};

/// Default number of segments fetched at once.
pub const DEFAULT_SEGMENT_CONCURRENCY: usize = 4;

/// A resolved segment playlist.
#[derive(Debug, Clone)]
pub struct SegmentPlaylist {
    pub variant: VideoVariant,
    pub base_url: String,
    pub segments: Vec<String>,
}

impl SegmentPlaylist {
    /// Absolute segment URLs in playlist order.
    pub fn urls(&self) -> Result<Vec<String>> {
        self.segments
            .iter()
            .map(|uri| kaltura::segment_url(&self.base_url, uri))
            .collect()
    }
}

/// Turns an embed URL into a single concatenated video file.
#[derive(Clone)]
pub struct VideoReconstructor {
    http: HttpClient,
    quality_param_id: i64,
    segment_concurrency: usize,
    show_progress: bool,
}

impl VideoReconstructor {
    pub fn new(http: HttpClient, quality_param_id: i64) -> Self {
        Self {
            http,
            quality_param_id,
            segment_concurrency: DEFAULT_SEGMENT_CONCURRENCY,
            show_progress: false,
        }
    }

    pub fn with_segment_concurrency(mut self, concurrency: usize) -> Self {
        self.segment_concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetch `embed_url` and write the video to `output`.
    ///
    /// The caller checks the download policy first. Nothing is left at
    /// `output` unless every segment arrived.
    pub async fn reconstruct(&self, embed_url: &str, output: &Path) -> Result<u64> {
        let playlist = self.resolve(embed_url).await?;
        self.fetch_segments(&playlist, output).await
    }

    /// Walk embed page, manifest and index playlist down to segment URIs.
    pub async fn resolve(&self, embed_url: &str) -> Result<SegmentPlaylist> {
        let page = self.http.get_text(embed_url).await?;
        let package = kaltura::extract_package_data(&page)?;
        let assets = kaltura::flavor_assets(&package)?;
        let variant = kaltura::select_variant(assets, self.quality_param_id)?;
        tracing::debug!(
            "Selected flavor {} of entry {}",
            variant.flavor_id,
            variant.entry_id
        );

        let manifest_url = kaltura::manifest_url(embed_url, &variant)?;
        let manifest = self.http.get_text(&manifest_url).await?;
        let index_url = kaltura::find_index_url(&manifest)?;

        let index = self.http.get_text(&index_url).await?;
        let segments = kaltura::segment_uris(&index);
        if segments.is_empty() {
            return Err(Error::MalformedUpstream("playlist has no segments".into()));
        }

        Ok(SegmentPlaylist {
            variant,
            base_url: kaltura::streaming_base(&index_url),
            segments,
        })
    }

    /// Download segments with bounded concurrency and append them in order.
    pub async fn fetch_segments(&self, playlist: &SegmentPlaylist, output: &Path) -> Result<u64> {
        let urls = playlist.urls()?;
        let parent = output
            .parent()
            .ok_or_else(|| Error::Download("Output path has no parent directory".into()))?;
        fs::create_dir_all(parent).await?;

        let temp_path = parent.join(format!(".video_temp_{}", uuid::Uuid::new_v4()));
        let mut file = File::create(&temp_path).await?;

        let progress = self
            .show_progress
            .then(|| create_item_bar(urls.len() as u64, "segments"));

        let result = async {
            let mut segments = stream::iter(urls.iter().enumerate())
                .map(|(i, url)| async move {
                    tracing::debug!("Downloading video segment {}", i + 1);
                    self.http.get_bytes(url).await
                })
                .buffered(self.segment_concurrency);

            let mut written: u64 = 0;
            while let Some(bytes) = segments.next().await {
                let bytes = bytes?;
                file.write_all(&bytes).await?;
                written += bytes.len() as u64;
                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
            }
            file.flush().await?;
            Ok::<u64, Error>(written)
        }
        .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        drop(file);

        match result {
            Ok(written) => {
                fs::rename(&temp_path, output).await?;
                Ok(written)
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                Err(e)
            }
        }
    }
}
