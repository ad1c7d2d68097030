//! Embedded video reconstruction.
//!
//! Provides:
//! - Parsing of the player's embed page and streaming manifests
//! - Segment download and in-order concatenation

pub mod kaltura;
pub mod reconstruct;

pub use kaltura::{VideoVariant, SOURCE_QUALITY_PARAM_ID};
pub use reconstruct::{SegmentPlaylist, VideoReconstructor, DEFAULT_SEGMENT_CONCURRENCY};
