//! Common test utilities for canvas-mirror integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use canvas_mirror::api::{
    Assignment, CanvasSource, Course, File, Folder, FolderOwner, Group, HttpClient, MediaObject,
    Module, ModuleItem, Page, Quiz, RetryConfig, Submission, User,
};
use canvas_mirror::download::{Confirm, DownloadPolicy, MirrorStats};
use canvas_mirror::{Error, Mirror, MirrorOptions, OverwriteMode, Result};

/// In-memory Canvas tree.
///
/// Missing collections are empty, missing single resources are `NotFound`,
/// and any call whose key is listed in `denied` fails with `AccessDenied`.
#[derive(Default)]
pub struct FakeCanvas {
    pub user_id: u64,
    pub courses: Vec<Course>,
    pub front_pages: HashMap<u64, Page>,
    pub modules: HashMap<u64, Vec<Module>>,
    pub items: HashMap<(u64, u64), Vec<ModuleItem>>,
    pub groups: HashMap<u64, Vec<Group>>,
    pub folders: HashMap<FolderOwner, Vec<Folder>>,
    pub folder_files: HashMap<u64, Vec<File>>,
    pub files: HashMap<u64, File>,
    pub media: HashMap<u64, Vec<MediaObject>>,
    pub pages: HashMap<String, Page>,
    pub assignments: HashMap<u64, Assignment>,
    pub quizzes: HashMap<u64, Quiz>,
    /// Keyed by assignment id.
    pub submissions: HashMap<u64, Submission>,
    pub denied: HashSet<String>,
}

impl FakeCanvas {
    pub fn deny(&mut self, key: impl Into<String>) {
        self.denied.insert(key.into());
    }

    fn check(&self, key: String) -> Result<()> {
        if self.denied.contains(&key) {
            Err(Error::AccessDenied(key))
        } else {
            Ok(())
        }
    }

    fn found<T: Clone>(value: Option<&T>, key: String) -> Result<T> {
        value.cloned().ok_or(Error::NotFound(key))
    }
}

#[async_trait]
impl CanvasSource for FakeCanvas {
    async fn current_user(&self) -> Result<User> {
        Ok(from_json(json!({"id": self.user_id, "name": "Student"})))
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.check("courses".into())?;
        Ok(self.courses.clone())
    }

    async fn front_page(&self, course_id: u64) -> Result<Page> {
        let key = format!("front_page:{}", course_id);
        self.check(key.clone())?;
        Self::found(self.front_pages.get(&course_id), key)
    }

    async fn modules(&self, course_id: u64) -> Result<Vec<Module>> {
        self.check(format!("modules:{}", course_id))?;
        Ok(self.modules.get(&course_id).cloned().unwrap_or_default())
    }

    async fn module_items(&self, course_id: u64, module_id: u64) -> Result<Vec<ModuleItem>> {
        self.check(format!("module_items:{}:{}", course_id, module_id))?;
        Ok(self
            .items
            .get(&(course_id, module_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn groups(&self, course_id: u64) -> Result<Vec<Group>> {
        self.check(format!("groups:{}", course_id))?;
        Ok(self.groups.get(&course_id).cloned().unwrap_or_default())
    }

    async fn folders(&self, owner: FolderOwner) -> Result<Vec<Folder>> {
        self.check(format!("folders:{}", owner.id()))?;
        Ok(self.folders.get(&owner).cloned().unwrap_or_default())
    }

    async fn folder_files(&self, folder_id: u64) -> Result<Vec<File>> {
        self.check(format!("folder_files:{}", folder_id))?;
        Ok(self.folder_files.get(&folder_id).cloned().unwrap_or_default())
    }

    async fn file(&self, _course_id: u64, file_id: u64) -> Result<File> {
        let key = format!("file:{}", file_id);
        self.check(key.clone())?;
        Self::found(self.files.get(&file_id), key)
    }

    async fn media_objects(&self, course_id: u64) -> Result<Vec<MediaObject>> {
        self.check(format!("media:{}", course_id))?;
        Ok(self.media.get(&course_id).cloned().unwrap_or_default())
    }

    async fn page(&self, _course_id: u64, page_url: &str) -> Result<Page> {
        let key = format!("page:{}", page_url);
        self.check(key.clone())?;
        Self::found(self.pages.get(page_url), key)
    }

    async fn assignment(&self, _course_id: u64, assignment_id: u64) -> Result<Assignment> {
        let key = format!("assignment:{}", assignment_id);
        self.check(key.clone())?;
        Self::found(self.assignments.get(&assignment_id), key)
    }

    async fn quiz(&self, _course_id: u64, quiz_id: u64) -> Result<Quiz> {
        let key = format!("quiz:{}", quiz_id);
        self.check(key.clone())?;
        Self::found(self.quizzes.get(&quiz_id), key)
    }

    async fn submission(&self, _course_id: u64, assignment_id: u64, user_id: u64) -> Result<Submission> {
        assert_eq!(user_id, self.user_id, "submission requested for another user");
        let key = format!("submission:{}", assignment_id);
        self.check(key.clone())?;
        Self::found(self.submissions.get(&assignment_id), key)
    }
}

pub fn from_json<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("valid fixture")
}

pub fn course(id: u64, name: &str) -> Course {
    from_json(json!({"id": id, "name": name}))
}

pub fn module(id: u64, name: &str) -> Module {
    from_json(json!({"id": id, "name": name}))
}

pub fn item(id: u64, title: &str, kind: &str, content_id: Option<u64>, page_url: Option<&str>) -> ModuleItem {
    from_json(json!({
        "id": id,
        "title": title,
        "type": kind,
        "content_id": content_id,
        "page_url": page_url,
    }))
}

pub fn file(id: u64, name: &str, url: &str) -> File {
    from_json(json!({"id": id, "display_name": name, "url": url, "size": 3}))
}

pub fn page(body: &str) -> Page {
    from_json(json!({"url": "page", "title": "Page", "body": body}))
}

/// Scripted overwrite answers, counting prompts.
pub struct Scripted {
    pub answer: bool,
    pub asked: Arc<AtomicUsize>,
}

impl Confirm for Scripted {
    fn confirm(&self, _path: &Path) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

pub fn http() -> HttpClient {
    HttpClient::new(Duration::from_secs(5), RetryConfig::with_max_retries(0)).expect("http client")
}

pub fn options() -> MirrorOptions {
    MirrorOptions {
        videos: false,
        markdown: true,
        ..MirrorOptions::default()
    }
}

pub fn mirror(source: FakeCanvas, root: &Path, mode: OverwriteMode, options: MirrorOptions) -> Mirror {
    let stats = Arc::new(MirrorStats::new());
    let policy = Arc::new(DownloadPolicy::new(mode, stats.clone()));
    let user_id = source.user_id;
    Mirror::new(Arc::new(source), http(), policy, stats, options, root, user_id)
}

pub fn mirror_with_prompter(
    source: FakeCanvas,
    root: &Path,
    prompter: Scripted,
    options: MirrorOptions,
) -> Mirror {
    let stats = Arc::new(MirrorStats::new());
    let policy = Arc::new(DownloadPolicy::with_prompter(
        OverwriteMode::Ask,
        Box::new(prompter),
        stats.clone(),
    ));
    let user_id = source.user_id;
    Mirror::new(Arc::new(source), http(), policy, stats, options, root, user_id)
}
