//! Statistics reporting.

use console::style;

use crate::download::MirrorStats;

/// Print the totals of a run.
pub fn print_mirror_stats(stats: &MirrorStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Mirror Statistics:").bold());
    println!("  Courses:  {}", stats.courses());
    println!("  Written:  {}", style(stats.written()).green());
    println!("  Videos:   {}", stats.videos());
    println!("  Skipped:  {} (already present)", stats.skipped());
    if stats.failed() > 0 {
        println!("  Failed:   {}", style(stats.failed()).red());
    }
    if stats.warnings() > 0 {
        println!(
            "  Warnings: {} ({} unsupported)",
            style(stats.warnings()).yellow(),
            stats.unsupported()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}
