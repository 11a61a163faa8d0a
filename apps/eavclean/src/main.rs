//! eavclean - remove orphaned platform data
//!
//! Entry point wiring configuration, the database, and the event channel
//! into one of the cleanup commands.

mod cli;
mod commands;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::commands::{execute_command, CommandResult};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::setup::SystemSetup;
use clap::Parser;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm};
use eavclean_config::Config;
use eavclean_events::EventReceiver;
use eavclean_types::ColorChoice;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode && !matches!(e, CliError::Aborted) {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // File config (or defaults), then environment, then CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    init_tracing(cli.global.json, cli.global.debug, &config.logs_dir());
    info!("Starting eavclean v{}", env!("CARGO_PKG_VERSION"));

    let color = config.general.color;
    let renderer = OutputRenderer::new(cli.global.json, color);

    if !cli.command.dry_run() {
        confirm_destructive_run(&cli.global, &renderer)?;
    }

    info!(
        domains = ?cli.command.domains(),
        dry_run = cli.command.dry_run(),
        "Running cleanup"
    );

    let mut setup = SystemSetup::new(config);
    setup.initialize().await?;

    let (event_sender, event_receiver) = eavclean_events::channel();

    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let result = execute_command_with_events(
        &setup,
        cli.command,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    if !result.is_success() {
        return Err(CliError::Incomplete(result.failure_count()));
    }

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    setup: &SystemSetup,
    command: Commands,
    event_sender: eavclean_events::EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<CommandResult, CliError> {
    let mut command_future = Box::pin(execute_command(setup, command, event_sender));

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Ask before a run that deletes data
///
/// `--yes` and `--no-interaction` skip the prompt. Without them a
/// non-interactive stdin is refused rather than treated as consent.
fn confirm_destructive_run(global: &GlobalArgs, renderer: &OutputRenderer) -> Result<(), CliError> {
    if global.yes || global.no_interaction {
        return Ok(());
    }

    if !std::io::stdin().is_terminal() || global.json {
        return Err(CliError::InvalidArguments(
            "refusing to delete without confirmation; pass --yes or --dry-run".to_string(),
        ));
    }

    renderer.render_destructive_warning()?;
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you want to continue?")
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    if confirmed {
        Ok(())
    } else {
        renderer.render_aborted();
        Err(CliError::Aborted)
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file, in JSON mode too
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "eavclean-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,eavclean=debug,eavclean_reconcile=debug",
                                )
                            },
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // Keep stdout and stderr free of log lines
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,eavclean=warn,eavclean_reconcile=warn")
                }),
            )
            .init();
    }
}
