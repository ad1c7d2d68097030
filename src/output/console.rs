//! Console output utilities.

use console::{style, StyledObject};

use crate::config::Config;

fn tagged(tag: StyledObject<&str>, message: &str) {
    println!("{} {}", tag.bold(), message);
}

pub fn print_info(message: &str) {
    tagged(style("INFO").cyan(), message);
}

pub fn print_success(message: &str) {
    tagged(style("OK").green(), message);
}

pub fn print_warning(message: &str) {
    tagged(style("WARN").yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

pub fn print_banner() {
    println!(
        "{} {}",
        style("canvas-mirror").cyan().bold(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!("{}", style("Offline copies of Canvas LMS courses").dim());
}

/// Print the effective settings of a run.
pub fn print_config_summary(config: &Config) {
    let options = &config.options;
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Canvas:      {}", config.base_url());
    println!("  Directory:   {}", config.destination().display());
    println!("  Overwrite:   {}", options.overwrite);
    println!("  Markdown:    {}", on_off(options.markdown));
    println!(
        "  Videos:      {} (flavor {}, {} segments at once)",
        on_off(options.videos),
        options.quality_param_id,
        options.segment_concurrency
    );
    println!("  Concurrency: {} course(s)", options.concurrency);
    println!();
}
