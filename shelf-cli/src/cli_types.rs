//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Keep a game library tidy: transfer, rename, clean and reconcile", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/shelf/settings.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Library root, overriding admin.library_root
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the full pipeline, repeating every admin.wait_time_hours
    Run {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Rename library folders to their normalized names
    Rename {
        /// Show planned renames without executing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Remove extras, empty folders and duplicates from the library
    Clean {
        /// Show what would be removed without deleting anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Move finished downloads into the library
    Transfer,

    /// Purge broken entries from the RomM catalog
    Reconcile {
        /// Log flagged entries without deleting them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Print the normalized form of folder names
    Normalize {
        /// Raw folder names
        #[arg(required = true)]
        names: Vec<String>,

        /// Skip the metadata catalog lookup
        #[arg(long)]
        offline: bool,
    },

    /// Manage the cached metadata catalog
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Inspect and initialize the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Download the catalog now, regardless of age
    Fetch,

    /// Show the cached catalog's location, size and age
    Info,

    /// Delete the cached catalog
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the effective settings (passwords masked)
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file containing every default
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check the download client and RomM connections
    Test,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "clean", "-n", "--root", "/tmp/lib", "--quiet"])
            .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/lib")));
        assert!(matches!(cli.command, Commands::Clean { dry_run: true }));
    }

    #[test]
    fn normalize_requires_a_name() {
        assert!(Cli::try_parse_from(["shelf", "normalize"]).is_err());
    }
}
