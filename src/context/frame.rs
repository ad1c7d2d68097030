//! Context frames and logging scopes.

use std::fmt;
use std::path::PathBuf;

use crate::api::NodeId;

/// Kind of hierarchy position a frame records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Course,
    Module,
    Item,
    Folder,
    Group,
    Submission,
    /// A directory that exists only to separate trees (`files_<id>`, `media_<id>`).
    Synthetic,
}

impl FrameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Course => "course",
            FrameKind::Module => "module",
            FrameKind::Item => "item",
            FrameKind::Folder => "folder",
            FrameKind::Group => "group",
            FrameKind::Submission => "submission",
            FrameKind::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hierarchical logging scope, e.g. `course_12/module_3/item_40`.
///
/// Attached to log events as the `scope` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogScope(String);

impl LogScope {
    /// Qualify this scope with one more segment.
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            LogScope(segment.to_string())
        } else {
            LogScope(format!("{}/{}", self.0, segment))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// One entry of the context stack.
#[derive(Debug, Clone)]
pub struct ContextFrame {
    pub name: String,
    pub kind: FrameKind,
    pub id: NodeId,
    pub scope: LogScope,
    /// Directory contributed to the current path, relative to the parent frame.
    pub(crate) dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_qualification() {
        let root = LogScope::default();
        assert_eq!(root.to_string(), "root");

        let course = root.child("course_1");
        let module = course.child("module_2");
        assert_eq!(course.as_str(), "course_1");
        assert_eq!(module.to_string(), "course_1/module_2");
    }
}
