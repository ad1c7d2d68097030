//! Plain HTTP fetching for file bytes, embed pages, manifests and segments.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{header, Client, Response, StatusCode};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::api::retry::{with_retry, RetryConfig};
use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// HTTP client shared by the API client, the traversal and the video pipeline.
///
/// The bearer token is only sent to the platform's own host; third-party
/// hosts (video CDNs, file storage redirects) get anonymous requests.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    auth: Option<(String, String)>,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client with a per-request timeout.
    pub fn new(timeout: Duration, retry: RetryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("canvas-mirror/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth: None,
            retry,
        })
    }

    /// Authenticate requests to the host of `base_url` with `token`.
    pub fn with_bearer(mut self, base_url: &str, token: &str) -> Result<Self> {
        let host = Url::parse(base_url)?
            .host_str()
            .ok_or_else(|| Error::Config(format!("Base URL has no host: {}", base_url)))?
            .to_string();
        self.auth = Some((host, token.to_string()));
        Ok(self)
    }

    /// GET a URL, classifying the response status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let parsed = Url::parse(url)?;
        with_retry(&self.retry, || self.send_once(&parsed)).await
    }

    async fn send_once(&self, url: &Url) -> Result<Response> {
        let mut request = self.client.get(url.clone());
        if let Some((host, token)) = &self.auth {
            if url.host_str() == Some(host.as_str()) {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
        }

        tracing::debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::AccessDenied(format!("{} (HTTP {})", url, status)))
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound(url.to_string())),
            _ => Err(Error::HttpStatus {
                status,
                url: url.to_string(),
            }),
        }
    }

    /// Fetch a URL as text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    /// Fetch a URL into memory.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Stream a URL into a file, returning the number of bytes written.
    ///
    /// Bytes land in a temporary sibling first; `output_path` is only replaced
    /// once the whole body arrived, so a failed transfer leaves any earlier
    /// copy untouched.
    pub async fn download_to(&self, url: &str, output_path: &Path, show_progress: bool) -> Result<u64> {
        let response = self.get(url).await?;

        let parent = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp_path = parent.join(format!(".download_temp_{}", uuid::Uuid::new_v4()));

        let downloaded = match stream_body(response, &temp_path, show_progress).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, output_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(downloaded)
    }
}

async fn stream_body(response: Response, path: &Path, show_progress: bool) -> Result<u64> {
    let content_length = response.content_length();
    let progress = if show_progress && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false) {
        Some(create_download_bar(content_length.unwrap_or(0)))
    } else {
        None
    };

    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(ref pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(downloaded)
}
