//! The context stack: where in the hierarchy the traversal currently is.

use std::path::{Path, PathBuf};

use crate::api::{Node, NodeId};
use crate::context::frame::{ContextFrame, FrameKind, LogScope};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, filename_or};

/// Stack of frames rooted at the mirror destination.
///
/// The stack is owned by a single traversal path. Parallel branches each get
/// a clone taken at their starting position, so no frame is ever shared.
#[derive(Debug, Clone)]
pub struct ContextStack {
    root: PathBuf,
    root_scope: LogScope,
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            root_scope: LogScope::default(),
            frames: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Push a frame and create its directory.
    ///
    /// Returns the depth before the push, to be handed back to
    /// [`pop_expecting`](Self::pop_expecting).
    pub fn push(&mut self, name: &str, kind: FrameKind, id: NodeId) -> Result<usize> {
        let scope = self.current_scope().child(&format!("{}_{}", kind, id));
        self.push_frame(name, kind, id, scope)
    }

    /// Push a frame for a hierarchy node, named by its display name or id.
    pub fn push_node<N: Node>(&mut self, node: &N, kind: FrameKind) -> Result<usize> {
        self.push(&node.frame_name(), kind, node.node_id())
    }

    /// Push a separator directory named `{label}_{owner}`.
    pub fn push_synthetic(&mut self, label: &str, owner: NodeId) -> Result<usize> {
        let name = format!("{}_{}", label, owner);
        let scope = self.current_scope().child(&name);
        self.push_frame(&name, FrameKind::Synthetic, owner, scope)
    }

    fn push_frame(
        &mut self,
        name: &str,
        kind: FrameKind,
        id: NodeId,
        scope: LogScope,
    ) -> Result<usize> {
        let depth = self.depth();
        let dir = frame_dir(name, kind, &id);

        tracing::info!(scope = %scope, "{}", name);
        self.frames.push(ContextFrame {
            name: name.to_string(),
            kind,
            id,
            scope,
            dir,
        });

        if let Err(e) = ensure_dir(&self.current_path()) {
            self.frames.pop();
            return Err(e);
        }

        Ok(depth)
    }

    /// Remove the top frame.
    pub fn pop(&mut self) -> Result<ContextFrame> {
        self.frames.pop().ok_or(Error::StackInvariant {
            expected: 1,
            actual: 0,
        })
    }

    /// Remove the top frame, verifying it was pushed at `depth_before`.
    pub fn pop_expecting(&mut self, depth_before: usize) -> Result<ContextFrame> {
        let expected = depth_before + 1;
        if self.depth() != expected {
            return Err(Error::StackInvariant {
                expected,
                actual: self.depth(),
            });
        }
        self.pop()
    }

    /// Destination directory of the current position.
    pub fn current_path(&self) -> PathBuf {
        let mut path = self.root.clone();
        for frame in &self.frames {
            path.push(&frame.dir);
        }
        path
    }

    pub fn current_id(&self) -> Option<&NodeId> {
        self.frames.last().map(|f| &f.id)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.frames.last().map(|f| f.name.as_str())
    }

    pub fn current_scope(&self) -> &LogScope {
        self.frames
            .last()
            .map(|f| &f.scope)
            .unwrap_or(&self.root_scope)
    }

    pub fn frames(&self) -> &[ContextFrame] {
        &self.frames
    }
}

/// Directory a frame contributes. Folder names are slash-separated paths from
/// the tree root and become nested directories.
fn frame_dir(name: &str, kind: FrameKind, id: &NodeId) -> PathBuf {
    let fallback = id.to_string();
    if kind == FrameKind::Folder {
        let parts: Vec<String> = name
            .split('/')
            .filter(|p| !p.trim().is_empty())
            .map(|p| filename_or(p, &fallback))
            .collect();
        if !parts.is_empty() {
            return parts.iter().collect();
        }
    }
    PathBuf::from(filename_or(name, &fallback))
}
