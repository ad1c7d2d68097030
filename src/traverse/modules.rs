//! Modules, their items and the current user's submissions.

use crate::api::{ItemContent, Module, ModuleItem, Node};
use crate::context::{ContextStack, FrameKind};
use crate::download::DownloadTask;
use crate::error::{Error, Result};
use crate::fs::filename_or;
use crate::traverse::engine::Mirror;

impl Mirror {
    /// Items are listed before the module frame is entered, so a module whose
    /// items cannot be read leaves no directory behind.
    pub(crate) async fn visit_module(
        &self,
        stack: &mut ContextStack,
        course_id: u64,
        module: &Module,
    ) -> Result<()> {
        let items = self.source.module_items(course_id, module.id).await?;

        let pushed = stack.push_node(module, FrameKind::Module);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let mut result = Ok(());
        for item in &items {
            let visited = self.visit_item(stack, course_id, item).await;
            result = self.contain(stack, &format!("item {}", item.frame_name()), visited);
            if result.is_err() {
                break;
            }
        }

        stack.pop_expecting(depth)?;
        result
    }

    async fn visit_item(&self, stack: &mut ContextStack, course_id: u64, item: &ModuleItem) -> Result<()> {
        let content = item.content();
        if let ItemContent::Unsupported(kind) = &content {
            tracing::warn!(
                scope = %stack.current_scope(),
                "Unsupported module item type '{}' ({})",
                kind,
                item.frame_name()
            );
            self.stats.record_unsupported();
            return Ok(());
        }

        let pushed = stack.push_node(item, FrameKind::Item);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let result = match content {
            ItemContent::File(file_id) => self.handle_file(stack, course_id, file_id, item).await,
            ItemContent::Page(page_url) => self.handle_page(stack, course_id, &page_url).await,
            ItemContent::Assignment(id) => self.handle_assignment(stack, course_id, id).await,
            ItemContent::Quiz(id) => self.handle_quiz(stack, course_id, id).await,
            ItemContent::Unsupported(kind) => Err(Error::UnsupportedContent(kind)),
        };

        stack.pop_expecting(depth)?;
        result
    }

    async fn handle_file(
        &self,
        stack: &mut ContextStack,
        course_id: u64,
        file_id: u64,
        item: &ModuleItem,
    ) -> Result<()> {
        let file = self.source.file(course_id, file_id).await?;
        let Some(url) = file.url.as_deref() else {
            self.warn(stack, format_args!("File {} has no download URL", file.id));
            return Ok(());
        };

        let name = file
            .display_name
            .as_deref()
            .or(item.title.as_deref())
            .unwrap_or_default();
        let destination = stack
            .current_path()
            .join(filename_or(name, &file.id.to_string()));

        self.run_task(stack, DownloadTask::new(url, destination)).await;
        Ok(())
    }

    async fn handle_page(&self, stack: &mut ContextStack, course_id: u64, page_url: &str) -> Result<()> {
        let page = self.source.page(course_id, page_url).await?;
        if let Some(body) = page.body.as_deref() {
            self.save_document(stack, "page", body).await?;
        }
        Ok(())
    }

    async fn handle_assignment(&self, stack: &mut ContextStack, course_id: u64, assignment_id: u64) -> Result<()> {
        let assignment = self.source.assignment(course_id, assignment_id).await?;

        self.write_metadata(stack, "assignment.json", &assignment).await?;
        if let Some(description) = assignment.description.as_deref() {
            self.save_document(stack, "assignment", description).await?;
        }

        let submission = self.visit_submission(stack, course_id, assignment.id).await;
        self.contain(stack, "submission", submission)
    }

    async fn handle_quiz(&self, stack: &mut ContextStack, course_id: u64, quiz_id: u64) -> Result<()> {
        let quiz = self.source.quiz(course_id, quiz_id).await?;

        if let Some(description) = quiz.description.as_deref() {
            self.save_document(stack, "quiz", description).await?;
        }
        self.write_metadata(stack, "quiz.json", &quiz).await?;
        Ok(())
    }

    async fn visit_submission(&self, stack: &mut ContextStack, course_id: u64, assignment_id: u64) -> Result<()> {
        let submission = self
            .source
            .submission(course_id, assignment_id, self.user_id)
            .await?;

        let pushed = stack.push_node(&submission, FrameKind::Submission);
        let Some(depth) = self.entered(stack, pushed)? else {
            return Ok(());
        };

        let dir = stack.current_path();
        if submission.attachments.is_empty() {
            tracing::debug!(scope = %stack.current_scope(), "No attachments found");
        }
        for (i, attachment) in submission.attachments.iter().enumerate() {
            let destination = dir.join(filename_or(&attachment.filename, &format!("attachment_{}", i)));
            self.run_task(stack, DownloadTask::new(attachment.url.as_str(), destination))
                .await;
        }

        let result = self
            .write_metadata(stack, &format!("submission_{}.json", submission.id), &submission)
            .await;

        stack.pop_expecting(depth)?;
        result
    }
}
