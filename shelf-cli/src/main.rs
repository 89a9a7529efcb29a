//! shelf CLI
//!
//! Moves finished downloads into the game library, normalizes folder names,
//! sweeps out clutter, and keeps the RomM catalog free of broken entries.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use shelf_lib::{Settings, settings_path};

use cli_types::{CacheAction, Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!(
            "{} {}",
            "error:".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.clone().unwrap_or_else(settings_path);

    // These must work even when the settings file does not parse.
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Path => {
                logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref())?;
                commands::config::run_config_path(&config_path);
                return Ok(());
            }
            ConfigAction::Init { force } => {
                logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref())?;
                return commands::config::run_config_init(&config_path, *force);
            }
            ConfigAction::Show | ConfigAction::Test => {}
        }
    }

    let mut settings = Settings::load(&config_path)?;
    if let Some(root) = cli.root {
        settings.admin.library_root = root;
    }

    let verbose = cli.verbose || settings.admin.debug_logging;
    let logfile = cli.logfile.or_else(|| settings.admin.log_file.clone());
    logging::init(cli.quiet, verbose, logfile.as_deref())?;

    match cli.command {
        Commands::Run { once } => commands::run::run_pipeline(&settings, once),
        Commands::Rename { dry_run } => commands::rename::run_rename(&settings, dry_run),
        Commands::Clean { dry_run } => {
            commands::clean::run_clean(&settings, dry_run);
            Ok(())
        }
        Commands::Transfer => commands::transfer::run_transfer(&settings),
        Commands::Reconcile { dry_run } => commands::reconcile::run_reconcile(&settings, dry_run),
        Commands::Normalize { names, offline } => {
            commands::normalize::run_normalize(&settings, &names, offline);
            Ok(())
        }
        Commands::Cache { action } => match action {
            CacheAction::Fetch => commands::cache::run_cache_fetch(&settings, cli.quiet),
            CacheAction::Info => commands::cache::run_cache_info(&settings),
            CacheAction::Clear => commands::cache::run_cache_clear(&settings),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings, &config_path),
            ConfigAction::Test => commands::config::run_config_test(&settings, cli.quiet),
            ConfigAction::Path | ConfigAction::Init { .. } => Ok(()),
        },
    }
}
