//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use eavclean_types::{ColorChoice, ReconcileDomain};
use std::path::PathBuf;

/// eavclean - clean up orphaned platform data
#[derive(Parser)]
#[command(name = "eavclean")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Remove orphaned configuration, redundant scope overrides and unused product media")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the logs directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not ask for confirmation before deleting
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Never prompt; implies --yes
    #[arg(short = 'n', long = "no-interaction", global = true)]
    pub no_interaction: bool,
}

/// Arguments shared by every cleanup command
#[derive(Args, Clone, Copy)]
pub struct RunArgs {
    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Remove configuration paths no longer declared by the schema
    #[command(name = "config-path")]
    ConfigPath {
        #[command(flatten)]
        run: RunArgs,

        /// Additional path to keep (repeatable)
        #[arg(long = "exclude", value_name = "PATH")]
        exclude: Vec<String>,
    },

    /// Remove scope values identical to the default value
    #[command(name = "config-scope")]
    ConfigScope {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Remove unused product images from disk and database
    Media {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run every cleanup; a failing one does not stop the others
    All {
        #[command(flatten)]
        run: RunArgs,

        /// Additional configuration path to keep (repeatable)
        #[arg(long = "exclude", value_name = "PATH")]
        exclude: Vec<String>,
    },
}

impl Commands {
    pub fn dry_run(&self) -> bool {
        match self {
            Self::ConfigPath { run, .. }
            | Self::ConfigScope { run }
            | Self::Media { run }
            | Self::All { run, .. } => run.dry_run,
        }
    }

    /// Domains this command touches, in execution order
    pub fn domains(&self) -> &'static [ReconcileDomain] {
        match self {
            Self::ConfigPath { .. } => &[ReconcileDomain::ConfigPaths],
            Self::ConfigScope { .. } => &[ReconcileDomain::ConfigScopes],
            Self::Media { .. } => &[ReconcileDomain::Media],
            Self::All { .. } => &[
                ReconcileDomain::ConfigPaths,
                ReconcileDomain::ConfigScopes,
                ReconcileDomain::Media,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_config_path_with_excludes() {
        let cli = Cli::parse_from([
            "eavclean",
            "config-path",
            "--dry-run",
            "--exclude",
            "a/b/c",
            "--exclude",
            "d/e/f",
        ]);
        assert!(cli.command.dry_run());
        match cli.command {
            Commands::ConfigPath { exclude, .. } => assert_eq!(exclude, vec!["a/b/c", "d/e/f"]),
            _ => panic!("expected config-path"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["eavclean", "media", "--json", "-n", "--color", "never"]);
        assert!(cli.global.json);
        assert!(cli.global.no_interaction);
        assert_eq!(cli.global.color, Some(ColorChoice::Never));
        assert!(!cli.command.dry_run());
    }

    #[test]
    fn test_all_runs_every_domain() {
        let cli = Cli::parse_from(["eavclean", "all", "--dry-run"]);
        assert_eq!(cli.command.domains().len(), 3);
    }
}
