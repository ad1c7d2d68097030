//! Traversal context.
//!
//! Provides:
//! - Context frames and their kinds
//! - Hierarchical logging scopes
//! - The context stack deriving destination directories

pub mod frame;
pub mod stack;

pub use frame::{ContextFrame, FrameKind, LogScope};
pub use stack::ContextStack;
