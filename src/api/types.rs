//! Canvas resource type definitions.
//!
//! Every resource keeps the fields it does not model in `extra`, so
//! serializing it back out reproduces the full upstream object.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unmodelled upstream fields.
pub type Fields = serde_json::Map<String, Value>;

/// Identifier of a hierarchy node. Most Canvas ids are integers, media
/// objects use string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(u64),
    Str(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(id) => write!(f, "{}", id),
            NodeId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId::Int(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::Str(id.to_string())
    }
}

/// A node of the content tree: always identifiable, optionally named.
pub trait Node {
    fn node_id(&self) -> NodeId;

    /// Human-readable name, if the resource has one.
    fn display_name(&self) -> Option<&str>;

    /// Display name, or the id when the resource has none.
    fn frame_name(&self) -> String {
        match self.display_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.node_id().to_string(),
        }
    }
}

macro_rules! impl_node {
    ($ty:ty, $name:ident) => {
        impl Node for $ty {
            fn node_id(&self) -> NodeId {
                NodeId::from(self.id)
            }

            fn display_name(&self) -> Option<&str> {
                self.$name.as_deref()
            }
        }
    };
}

/// The authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A course the user is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A wiki page (including the course front page).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A course module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// An entry of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Content-type tag (`File`, `Page`, `Assignment`, `Quiz`, ...).
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub content_id: Option<u64>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// What a module item points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemContent {
    File(u64),
    Page(String),
    Assignment(u64),
    Quiz(u64),
    /// Unknown tag, or a known tag without its reference.
    Unsupported(String),
}

impl ModuleItem {
    /// Resolve the content-type tag into a typed reference.
    pub fn content(&self) -> ItemContent {
        match (self.item_type.as_str(), self.content_id, &self.page_url) {
            ("File", Some(id), _) => ItemContent::File(id),
            ("Page", _, Some(url)) => ItemContent::Page(url.clone()),
            ("Assignment", Some(id), _) => ItemContent::Assignment(id),
            ("Quiz", Some(id), _) => ItemContent::Quiz(id),
            (other, _, _) => ItemContent::Unsupported(other.to_string()),
        }
    }
}

/// A course group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A folder of a course or group file tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    /// Slash-separated path from the tree root, e.g. `course files/Week 1`.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A file in a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    /// Download URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A media object attached to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaObject {
    pub media_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_sources: Vec<MediaSource>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// One rendition of a media object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    pub url: String,
    /// Canvas reports sizes as strings; numbers are accepted too.
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl MediaSource {
    /// Size in bytes, 0 when absent or unparsable.
    pub fn size_bytes(&self) -> u64 {
        match &self.size {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

impl MediaObject {
    /// Whether the media type tag denotes video.
    pub fn is_video(&self) -> bool {
        self.media_type
            .as_deref()
            .map(|t| t.contains("video"))
            .unwrap_or(false)
    }

    /// The largest source rendition.
    pub fn best_source(&self) -> Option<&MediaSource> {
        self.media_sources.iter().max_by_key(|s| s.size_bytes())
    }
}

/// An assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The current user's submission for an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    #[serde(default)]
    pub attachments: Vec<SubmissionAttachment>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A file attached to a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionAttachment {
    pub filename: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl_node!(Course, name);
impl_node!(Module, name);
impl_node!(ModuleItem, title);
impl_node!(Group, name);
impl_node!(Folder, full_name);
impl_node!(File, display_name);
impl_node!(Assignment, name);
impl_node!(Quiz, title);

impl Node for MediaObject {
    fn node_id(&self) -> NodeId {
        NodeId::Str(self.media_id.clone())
    }

    fn display_name(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Node for Submission {
    fn node_id(&self) -> NodeId {
        NodeId::from(self.id)
    }

    /// Submissions are always named by id.
    fn display_name(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_name_falls_back_to_id() {
        let module: Module = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(module.frame_name(), "7");

        let module: Module = serde_json::from_value(json!({"id": 7, "name": "Week 1"})).unwrap();
        assert_eq!(module.frame_name(), "Week 1");

        let module: Module = serde_json::from_value(json!({"id": 7, "name": "  "})).unwrap();
        assert_eq!(module.frame_name(), "7");
    }

    #[test]
    fn test_item_content() {
        let item: ModuleItem =
            serde_json::from_value(json!({"id": 1, "type": "File", "content_id": 42})).unwrap();
        assert_eq!(item.content(), ItemContent::File(42));

        let item: ModuleItem =
            serde_json::from_value(json!({"id": 2, "type": "Page", "page_url": "intro"}))
                .unwrap();
        assert_eq!(item.content(), ItemContent::Page("intro".into()));

        let item: ModuleItem =
            serde_json::from_value(json!({"id": 3, "type": "SubHeader"})).unwrap();
        assert_eq!(item.content(), ItemContent::Unsupported("SubHeader".into()));

        let item: ModuleItem = serde_json::from_value(json!({"id": 4, "type": "Quiz"})).unwrap();
        assert_eq!(item.content(), ItemContent::Unsupported("Quiz".into()));
    }

    #[test]
    fn test_extra_fields_roundtrip() {
        let raw = json!({
            "id": 5,
            "name": "Essay",
            "description": "<p>Write</p>",
            "points_possible": 10.0,
            "due_at": null
        });
        let assignment: Assignment = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&assignment).unwrap(), raw);
    }

    #[test]
    fn test_media_best_source() {
        let media: MediaObject = serde_json::from_value(json!({
            "media_id": "m-1",
            "title": "Lecture",
            "media_type": "video",
            "media_sources": [
                {"url": "http://x/small", "size": "100"},
                {"url": "http://x/large", "size": 2000},
                {"url": "http://x/odd", "size": "n/a"}
            ]
        }))
        .unwrap();

        assert!(media.is_video());
        assert_eq!(media.best_source().unwrap().url, "http://x/large");
        assert_eq!(media.node_id(), NodeId::Str("m-1".into()));
    }
}
