//! Traversal of the Canvas content tree.
//!
//! Provides:
//! - The mirror engine and its run options
//! - Course, module, item and submission visits
//! - Group, file tree and media visits
//! - Document persistence with asset follow-ups

pub mod documents;
pub mod engine;
pub mod modules;
pub mod trees;

pub use engine::{Mirror, MirrorOptions};
