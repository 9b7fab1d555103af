//! CLI argument definitions using clap derive

use crate::artifact::{Arch, Platform};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// stc - prebuilt native binding installer
///
/// Downloads the thread-sleep-compat bindings for every ABI generation and
/// architecture this platform can run, and keeps them in a per-user cache.
#[derive(Parser, Debug)]
#[command(name = "stc")]
#[command(author, version, about = "stc - prebuilt native binding installer", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "STC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download and cache prebuilt binaries (package install hook)
    Install(InstallArgs),

    /// Show what is cached for this platform
    Status(StatusArgs),

    /// Print the installed binding path for a runtime version
    Locate(LocateArgs),

    /// Remove installed binaries and the version manifest
    Clean(CleanArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Refetch every binary even if the cache looks current
    #[arg(short, long)]
    pub force: bool,

    /// Install this binaries release instead of the configured one
    #[arg(long, value_name = "VERSION")]
    pub binaries_version: Option<String>,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the locate command
#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Runtime version, e.g. 0.10.48
    pub runtime_version: String,

    /// Architecture (defaults to the host)
    #[arg(long, value_parser = parse_arch)]
    pub arch: Option<Arch>,

    /// Platform (defaults to the host)
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Show what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for status
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

fn parse_arch(s: &str) -> Result<Arch, String> {
    s.parse::<Arch>().map_err(|e| e.to_string())
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse::<Platform>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_names_the_tool() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("prebuilt native binding installer"));
    }

    #[test]
    fn install_flags() {
        let cli = Cli::parse_from(["stc", "install", "--force", "--binaries-version", "3"]);
        match cli.command {
            Commands::Install(args) => {
                assert!(args.force);
                assert_eq!(args.binaries_version.as_deref(), Some("3"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn locate_parses_arch() {
        let cli = Cli::parse_from(["stc", "locate", "0.10.48", "--arch", "ia32"]);
        match cli.command {
            Commands::Locate(args) => {
                assert_eq!(args.runtime_version, "0.10.48");
                assert_eq!(args.arch, Some(Arch::Ia32));
                assert!(args.platform.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn locate_rejects_unknown_arch() {
        assert!(Cli::try_parse_from(["stc", "locate", "0.10.48", "--arch", "vax"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["stc", "-vv", "status", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Status(StatusArgs {
                format: OutputFormat::Json
            })
        ));
    }
}
