//! Post-processing of stored HTML documents.

pub mod assets;
pub mod convert;

pub use assets::{scan_document, FileLink, PageAssets};
pub use convert::{Converter, Html2MdConverter};
