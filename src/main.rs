// src/main.rs

use anyhow::Result;
use clap::Parser;
use repo_harvester::cli::Cli;
use repo_harvester::config::ConfigBuilder;
#[cfg(feature = "progress")]
use repo_harvester::progress::IndicatifProgress;
use repo_harvester::progress::ProgressReporter;
use repo_harvester::run;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "repo_harvester=debug".parse()?
                } else {
                    "repo_harvester=info".parse()?
                },
            ),
        )
        .init();

    log::info!("Starting repo-harvester v{}...", env!("CARGO_PKG_VERSION"));

    // --- Setup ---
    let cli = Cli::parse();

    // Decide whether to show a progress bar. Show it if stderr is a TTY.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> = {
        #[cfg(feature = "progress")]
        {
            if atty::is(atty::Stream::Stderr) {
                Some(Arc::new(IndicatifProgress::new()))
            } else {
                None
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    };

    // --- Configuration & Execution ---
    let config = ConfigBuilder::from_cli(cli).build()?;
    log::debug!("Configuration built successfully: {:?}", config);

    if let Err(e) = run(&config, progress_reporter) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
