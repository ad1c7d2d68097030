//! The mirror engine and its course-level traversal.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, TryStreamExt};

use crate::api::{CanvasSource, Course, FolderOwner, HttpClient, Node};
use crate::config::Config;
use crate::context::{ContextStack, FrameKind};
use crate::download::{DownloadPolicy, MirrorStats};
use crate::error::{Error, Result};
use crate::extract::Html2MdConverter;
use crate::fs::ensure_dir;
use crate::video::{VideoReconstructor, DEFAULT_SEGMENT_CONCURRENCY, SOURCE_QUALITY_PARAM_ID};

/// Behaviour switches of a run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub videos: bool,
    pub markdown: bool,
    /// Courses visited at once.
    pub concurrency: usize,
    pub segment_concurrency: usize,
    pub quality_param_id: i64,
    pub show_progress: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            videos: true,
            markdown: true,
            concurrency: 1,
            segment_concurrency: DEFAULT_SEGMENT_CONCURRENCY,
            quality_param_id: SOURCE_QUALITY_PARAM_ID,
            show_progress: false,
        }
    }
}

impl MirrorOptions {
    pub fn from_config(config: &Config) -> Self {
        let options = &config.options;
        Self {
            videos: options.videos,
            markdown: options.markdown,
            concurrency: options.concurrency,
            segment_concurrency: options.segment_concurrency,
            quality_param_id: options.quality_param_id,
            show_progress: options.show_progress,
        }
    }
}

/// Walks a Canvas content tree and mirrors it to disk.
pub struct Mirror {
    pub(crate) source: Arc<dyn CanvasSource>,
    pub(crate) http: HttpClient,
    pub(crate) policy: Arc<DownloadPolicy>,
    pub(crate) stats: Arc<MirrorStats>,
    pub(crate) videos: VideoReconstructor,
    pub(crate) converter: Html2MdConverter,
    pub(crate) options: MirrorOptions,
    pub(crate) root: PathBuf,
    pub(crate) user_id: u64,
}

impl Mirror {
    pub fn new(
        source: Arc<dyn CanvasSource>,
        http: HttpClient,
        policy: Arc<DownloadPolicy>,
        stats: Arc<MirrorStats>,
        options: MirrorOptions,
        root: impl Into<PathBuf>,
        user_id: u64,
    ) -> Self {
        let videos = VideoReconstructor::new(http.clone(), options.quality_param_id)
            .with_segment_concurrency(options.segment_concurrency)
            .with_progress(options.show_progress);

        Self {
            source,
            http,
            policy,
            stats,
            videos,
            converter: Html2MdConverter,
            options,
            root: root.into(),
            user_id,
        }
    }

    pub fn stats(&self) -> &MirrorStats {
        &self.stats
    }

    /// Mirror every course.
    ///
    /// Courses run up to `concurrency` at a time, each on its own copy of the
    /// root stack. Only fatal errors are returned; everything else has been
    /// logged and counted by the time this returns.
    pub async fn run(&self, courses: Vec<Course>) -> Result<()> {
        ensure_dir(&self.root)?;
        let root = ContextStack::new(&self.root);

        stream::iter(courses.into_iter().map(Ok::<Course, Error>))
            .try_for_each_concurrent(self.options.concurrency.max(1), |course| {
                let mut stack = root.clone();
                async move { self.visit_course(&mut stack, &course).await }
            })
            .await
    }

    pub(crate) async fn visit_course(&self, stack: &mut ContextStack, course: &Course) -> Result<()> {
        let pushed = stack.push_node(course, FrameKind::Course);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };
        self.stats.record_course();

        let result = self.course_body(stack, course.id).await;
        stack.pop_expecting(depth)?;
        result
    }

    async fn course_body(&self, stack: &mut ContextStack, course_id: u64) -> Result<()> {
        let front = self.visit_front_page(stack, course_id).await;
        self.contain(stack, "front page", front)?;

        let modules = self.visit_modules(stack, course_id).await;
        self.contain(stack, "modules", modules)?;

        let groups = self.visit_groups(stack, course_id).await;
        self.contain(stack, "groups", groups)?;

        let files = self.scrape_files(stack, FolderOwner::Course(course_id)).await;
        self.contain(stack, "files", files)?;

        let media = self.scrape_media(stack, course_id).await;
        self.contain(stack, "media objects", media)
    }

    async fn visit_front_page(&self, stack: &mut ContextStack, course_id: u64) -> Result<()> {
        let page = self.source.front_page(course_id).await?;
        if let Some(body) = page.body.as_deref() {
            self.save_document(stack, "front_page", body).await?;
        }
        Ok(())
    }

    async fn visit_modules(&self, stack: &mut ContextStack, course_id: u64) -> Result<()> {
        let modules = self.source.modules(course_id).await?;
        for module in &modules {
            let result = self.visit_module(stack, course_id, module).await;
            self.contain(stack, &format!("module {}", module.frame_name()), result)?;
        }
        Ok(())
    }

    async fn visit_groups(&self, stack: &mut ContextStack, course_id: u64) -> Result<()> {
        let groups = self.source.groups(course_id).await?;
        for group in &groups {
            let result = self.visit_group(stack, group).await;
            self.contain(stack, &format!("group {}", group.frame_name()), result)?;
        }
        Ok(())
    }

    /// Turn the outcome of a push into the depth to pop back to, or `None`
    /// when the frame could not be entered and the subtree is skipped.
    pub(crate) fn entered(&self, stack: &ContextStack, pushed: Result<usize>) -> Result<Option<usize>> {
        match pushed {
            Ok(depth) => Ok(Some(depth)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.warn(stack, format_args!("Cannot create directory: {}", e));
                Ok(None)
            }
        }
    }

    /// Contain the failure of one branch: fatal errors propagate, anything
    /// else becomes a warning naming what was skipped.
    pub(crate) fn contain(&self, stack: &ContextStack, what: &str, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) if e.is_access_error() => {
                self.warn(stack, format_args!("{} not accessible: {}", what, e));
                Ok(())
            }
            Err(e) => {
                self.warn(stack, format_args!("Skipping {}: {}", what, e));
                Ok(())
            }
        }
    }

    pub(crate) fn warn(&self, stack: &ContextStack, message: impl Display) {
        tracing::warn!(scope = %stack.current_scope(), "{}", message);
        self.stats.record_warning();
    }
}
