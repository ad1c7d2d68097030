//! The interface the traversal consumes from the platform.

use async_trait::async_trait;

use crate::api::types::*;
use crate::error::Result;

/// Owner of a file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderOwner {
    Course(u64),
    Group(u64),
}

impl FolderOwner {
    pub fn id(&self) -> u64 {
        match self {
            FolderOwner::Course(id) | FolderOwner::Group(id) => *id,
        }
    }
}

/// Read access to a Canvas content tree.
///
/// Every call may fail with [`Error::AccessDenied`](crate::Error::AccessDenied)
/// or [`Error::NotFound`](crate::Error::NotFound), independently of transport
/// failures.
#[async_trait]
pub trait CanvasSource: Send + Sync {
    async fn current_user(&self) -> Result<User>;

    async fn courses(&self) -> Result<Vec<Course>>;

    async fn front_page(&self, course_id: u64) -> Result<Page>;

    async fn modules(&self, course_id: u64) -> Result<Vec<Module>>;

    async fn module_items(&self, course_id: u64, module_id: u64) -> Result<Vec<ModuleItem>>;

    async fn groups(&self, course_id: u64) -> Result<Vec<Group>>;

    /// All folders of the tree, flattened.
    async fn folders(&self, owner: FolderOwner) -> Result<Vec<Folder>>;

    async fn folder_files(&self, folder_id: u64) -> Result<Vec<File>>;

    async fn file(&self, course_id: u64, file_id: u64) -> Result<File>;

    async fn media_objects(&self, course_id: u64) -> Result<Vec<MediaObject>>;

    async fn page(&self, course_id: u64, page_url: &str) -> Result<Page>;

    async fn assignment(&self, course_id: u64, assignment_id: u64) -> Result<Assignment>;

    async fn quiz(&self, course_id: u64, quiz_id: u64) -> Result<Quiz>;

    async fn submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> Result<Submission>;
}
