//! Groups, file trees and course media.

use crate::api::{Folder, FolderOwner, Group, MediaObject, Node, NodeId};
use crate::context::{ContextStack, FrameKind};
use crate::download::DownloadTask;
use crate::error::{Error, Result};
use crate::fs::filename_or;
use crate::traverse::engine::Mirror;

impl Mirror {
    pub(crate) async fn visit_group(&self, stack: &mut ContextStack, group: &Group) -> Result<()> {
        let pushed = stack.push_node(group, FrameKind::Group);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let result = async {
            self.write_metadata(stack, "group.json", group).await?;
            let files = self.scrape_files(stack, FolderOwner::Group(group.id)).await;
            self.contain(stack, "files", files)
        }
        .await;

        stack.pop_expecting(depth)?;
        result
    }

    /// Mirror the file tree of a course or group under `files_<ownerId>`.
    pub(crate) async fn scrape_files(&self, stack: &mut ContextStack, owner: FolderOwner) -> Result<()> {
        let pushed = stack.push_synthetic("files", NodeId::from(owner.id()));
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let result = async {
            let folders = self.source.folders(owner).await?;
            for folder in &folders {
                let visited = self.visit_folder(stack, folder).await;
                self.contain(stack, &format!("folder {}", folder.frame_name()), visited)?;
            }
            Ok::<(), Error>(())
        }
        .await;
        let result = self.contain(stack, "files", result);

        stack.pop_expecting(depth)?;
        result
    }

    async fn visit_folder(&self, stack: &mut ContextStack, folder: &Folder) -> Result<()> {
        let files = self.source.folder_files(folder.id).await?;

        let pushed = stack.push_node(folder, FrameKind::Folder);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let dir = stack.current_path();
        for file in &files {
            let Some(url) = file.url.as_deref() else {
                self.warn(stack, format_args!("File {} has no download URL", file.id));
                continue;
            };
            let destination = dir.join(filename_or(&file.frame_name(), &file.id.to_string()));
            self.run_task(stack, DownloadTask::new(url, destination)).await;
        }

        stack.pop_expecting(depth)?;
        Ok(())
    }

    /// Mirror course media objects under `media_<courseId>`.
    pub(crate) async fn scrape_media(&self, stack: &mut ContextStack, course_id: u64) -> Result<()> {
        let pushed = stack.push_synthetic("media", NodeId::from(course_id));
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let result = async {
            let media = self.source.media_objects(course_id).await?;
            for object in &media {
                self.handle_media(stack, object).await;
            }
            Ok::<(), Error>(())
        }
        .await;
        let result = self.contain(stack, "media objects", result);

        stack.pop_expecting(depth)?;
        result
    }

    async fn handle_media(&self, stack: &ContextStack, object: &MediaObject) {
        if !object.is_video() {
            tracing::warn!(
                scope = %stack.current_scope(),
                "Media '{}' type {} is unsupported",
                object.frame_name(),
                object.media_type.as_deref().unwrap_or("unknown")
            );
            self.stats.record_unsupported();
            return;
        }

        let Some(source) = object.best_source() else {
            self.warn(stack, format_args!("Media '{}' has no sources", object.frame_name()));
            return;
        };

        let destination = stack
            .current_path()
            .join(filename_or(&object.frame_name(), &object.media_id));
        self.run_task(stack, DownloadTask::new(source.url.as_str(), destination))
            .await;
    }
}
