//! Canvas Mirror - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use canvas_mirror::{
    api::{CanvasApi, CanvasSource, HttpClient, RetryConfig},
    cli::Args,
    config::{validate_config, Config},
    download::{DownloadPolicy, MirrorStats},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_info, print_mirror_stats,
        print_success, print_warning,
    },
    traverse::{Mirror, MirrorOptions},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::AccessDenied(_) | Error::NotFound(_) | Error::Api(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_) | Error::HttpStatus { .. } => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                Error::StackInvariant { .. } => ExitCode::from(exit_codes::ABORT as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    if args.save_config {
        config.save(&config_path)?;
        print_info(&format!("Configuration saved to {}", config_path.display()));
    }

    let base_url = config.base_url();
    let destination = config.destination();
    print_config_summary(&config);

    // Initialize API client
    let retry = RetryConfig::with_max_retries(config.options.max_retries);
    let http = HttpClient::new(
        Duration::from_secs(config.options.request_timeout_secs),
        retry,
    )?
    .with_bearer(&base_url, &config.canvas.access_token)?;
    let api = Arc::new(CanvasApi::new(&base_url, http.clone()));

    // Validate token by fetching the current user
    print_info("Connecting to Canvas...");
    let user = api.current_user().await?;
    print_info(&format!(
        "Logged in as: {}",
        user.name.as_deref().unwrap_or("unknown user")
    ));

    let courses = api.courses().await?;
    print_info(&format!("Found {} course(s)", courses.len()));

    let stats = Arc::new(MirrorStats::new());
    let policy = Arc::new(DownloadPolicy::new(config.options.overwrite, stats.clone()));
    let mirror = Mirror::new(
        api,
        http,
        policy,
        stats.clone(),
        MirrorOptions::from_config(&config),
        destination,
        user.id,
    );

    mirror.run(courses).await?;

    // Print run statistics
    print_mirror_stats(&stats);

    if stats.failed() > 0 {
        print_warning(&format!("{} download(s) failed", stats.failed()));
    } else {
        print_success("Mirror complete");
    }

    Ok(())
}
