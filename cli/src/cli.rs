//! Command-line interface definition.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the dotfiles symlink manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Symlink dotfiles from a repository into your home directory",
    version
)]
pub struct Cli {
    /// Subcommand to run; `restore` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, defaulting to [`Command::Restore`].
    #[must_use]
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Restore)
    }
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Back up and replace conflicting entries
    #[arg(short = 'f', long, global = true)]
    pub force: bool,

    /// Override the home directory links are created in
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Override the repository directory links point into
    #[arg(long, global = true, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Read settings from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Link repository files into the home directory
    Restore,
    /// Move home paths into the repository and link them back
    Stow(PathsOpts),
    /// Move repository content back to its home location
    Unstow(PathsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Stow(_) => "stow",
            Self::Unstow(_) => "unstow",
            Self::Version => "version",
        }
    }
}

/// Paths given to `stow` or `unstow`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PathsOpts {
    /// Home paths to act on
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}
