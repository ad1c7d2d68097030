//! Canvas REST API client.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header;
use serde::de::DeserializeOwned;

use crate::api::http::HttpClient;
use crate::api::source::{CanvasSource, FolderOwner};
use crate::api::types::*;
use crate::error::{Error, Result};

/// REST API path prefix.
const API_PREFIX: &str = "/api/v1";

/// Page size requested from paginated endpoints.
pub const PER_PAGE: usize = 100;

/// Canvas API client backed by [`HttpClient`].
pub struct CanvasApi {
    http: HttpClient,
    base_url: String,
}

impl CanvasApi {
    /// Create a client for `base_url` (scheme included). `http` must carry the
    /// bearer token for that host.
    pub fn new(base_url: &str, http: HttpClient) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Fetch and decode a single resource.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.endpoint(path);
        let response = self.http.get(&url).await.map_err(|e| describe(e, what))?;
        let text = response.text().await?;
        tracing::debug!("{} response length: {} bytes", what, text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                what,
                e,
                preview(&text)
            ))
        })
    }

    /// Fetch every page of a collection, following `Link: rel="next"`.
    async fn get_all<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut next = Some(format!(
            "{}{}per_page={}",
            self.endpoint(path),
            separator,
            PER_PAGE
        ));
        let mut items = Vec::new();
        let mut page = 1;

        while let Some(url) = next.take() {
            let response = self.http.get(&url).await.map_err(|e| describe(e, what))?;
            next = response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_link);

            let text = response.text().await?;
            let batch: Vec<T> = serde_json::from_str(&text).map_err(|e| {
                Error::Api(format!(
                    "Failed to parse {} page {}: {} - Response: {}",
                    what,
                    page,
                    e,
                    preview(&text)
                ))
            })?;
            tracing::debug!("Grabbed {} page {} ({} entries)", what, page, batch.len());

            items.extend(batch);
            page += 1;
        }

        Ok(items)
    }
}

/// First 500 characters of a response body for error messages.
fn preview(text: &str) -> String {
    text.chars().take(500).collect()
}

/// Name the collection in access errors so warnings say what was inaccessible.
fn describe(error: Error, what: &str) -> Error {
    match error {
        Error::AccessDenied(detail) => Error::AccessDenied(format!("{}: {}", what, detail)),
        Error::NotFound(detail) => Error::NotFound(format!("{}: {}", what, detail)),
        other => other,
    }
}

/// Extract the `rel="next"` target of an RFC 8288 `Link` header.
pub fn next_page_link(link_header: &str) -> Option<String> {
    static NEXT_LINK: OnceLock<Regex> = OnceLock::new();
    let pattern = NEXT_LINK
        .get_or_init(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("valid link pattern"));

    pattern
        .captures(link_header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[async_trait]
impl CanvasSource for CanvasApi {
    async fn current_user(&self) -> Result<User> {
        self.get_json("/users/self", "current user").await
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.get_all("/courses", "courses").await
    }

    async fn front_page(&self, course_id: u64) -> Result<Page> {
        self.get_json(&format!("/courses/{}/front_page", course_id), "front page")
            .await
    }

    async fn modules(&self, course_id: u64) -> Result<Vec<Module>> {
        self.get_all(&format!("/courses/{}/modules", course_id), "modules")
            .await
    }

    async fn module_items(&self, course_id: u64, module_id: u64) -> Result<Vec<ModuleItem>> {
        self.get_all(
            &format!("/courses/{}/modules/{}/items", course_id, module_id),
            "module items",
        )
        .await
    }

    async fn groups(&self, course_id: u64) -> Result<Vec<Group>> {
        self.get_all(&format!("/courses/{}/groups", course_id), "groups")
            .await
    }

    async fn folders(&self, owner: FolderOwner) -> Result<Vec<Folder>> {
        let path = match owner {
            FolderOwner::Course(id) => format!("/courses/{}/folders", id),
            FolderOwner::Group(id) => format!("/groups/{}/folders", id),
        };
        self.get_all(&path, "folders").await
    }

    async fn folder_files(&self, folder_id: u64) -> Result<Vec<File>> {
        self.get_all(&format!("/folders/{}/files", folder_id), "files")
            .await
    }

    async fn file(&self, course_id: u64, file_id: u64) -> Result<File> {
        self.get_json(&format!("/courses/{}/files/{}", course_id, file_id), "file")
            .await
    }

    async fn media_objects(&self, course_id: u64) -> Result<Vec<MediaObject>> {
        self.get_all(
            &format!("/courses/{}/media_objects", course_id),
            "media objects",
        )
        .await
    }

    async fn page(&self, course_id: u64, page_url: &str) -> Result<Page> {
        self.get_json(
            &format!("/courses/{}/pages/{}", course_id, page_url),
            "page",
        )
        .await
    }

    async fn assignment(&self, course_id: u64, assignment_id: u64) -> Result<Assignment> {
        self.get_json(
            &format!("/courses/{}/assignments/{}", course_id, assignment_id),
            "assignment",
        )
        .await
    }

    async fn quiz(&self, course_id: u64, quiz_id: u64) -> Result<Quiz> {
        self.get_json(
            &format!("/courses/{}/quizzes/{}", course_id, quiz_id),
            "quiz",
        )
        .await
    }

    async fn submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> Result<Submission> {
        self.get_json(
            &format!(
                "/courses/{}/assignments/{}/submissions/{}",
                course_id, assignment_id, user_id
            ),
            "submission",
        )
        .await
    }
}
