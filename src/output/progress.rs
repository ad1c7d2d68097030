//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

const BAR: &str = "[{bar:40.cyan/blue}]";

fn bar_with(total: u64, template: &str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    ProgressBar::new(total).with_style(style)
}

/// Byte progress of a single large file.
pub fn create_download_bar(total: u64) -> ProgressBar {
    bar_with(total, &format!("{{spinner:.green}} {BAR} {{bytes}}/{{total_bytes}} ({{eta}})"))
}

/// Count progress over `total` items, e.g. video segments.
pub fn create_item_bar(total: u64, label: &str) -> ProgressBar {
    bar_with(total, &format!("{{spinner:.green}} {label} {BAR} {{pos}}/{{len}}"))
}
