//! stc - prebuilt native binding installer
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use stc::cli::{Cli, Commands};
use stc::config::ConfigManager;
use stc::error::StcResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // The install hook must never fail the package install
    let is_install = matches!(cli.command, Commands::Install(_));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_install => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> StcResult<()> {
    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let loaded = manager.load().await;

    let json = matches!(&loaded, Ok(config) if config.general.log_format == "json");
    init_tracing(cli.verbose, json);
    debug!("Using config {}", manager.path().display());

    let config = loaded?;

    match cli.command {
        Commands::Install(args) => stc::cli::commands::install(args, &config).await,
        Commands::Status(args) => stc::cli::commands::status(args, &config).await,
        Commands::Locate(args) => stc::cli::commands::locate(args, &config).await,
        Commands::Clean(args) => stc::cli::commands::clean(args, &config).await,
        Commands::Config(args) => stc::cli::commands::config(args, &config, &manager).await,
        Commands::Completions { shell } => {
            stc::cli::commands::completions(shell);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays the install report
///
/// 0 = warn, 1 = info, 2+ = debug. `RUST_LOG` wins when set.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("stc=warn"),
        1 => EnvFilter::new("stc=info"),
        _ => EnvFilter::new("stc=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
