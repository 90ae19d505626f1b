//! Dotfiles symlink manager.
//!
//! Mirrors a dotfiles repository into the home directory as symlinks, and
//! adopts existing home paths back into the repository. Repository entry
//! names encode their home location: a leading `config__` segment maps to
//! `~/.config/`, `__` separates path segments, and top-level names gain a
//! leading dot.
//!
//! The public API is organised into four layers:
//!
//! - **[`mapping`]**: translate between repository names and home paths
//! - **[`resources`]**: idempotent symlink placement, backups, filesystem helpers
//! - **[`tasks`]**: named units of work (`restore`, `stow`, `unstow`) over a shared context
//! - **[`commands`]**: top-level subcommand orchestration and exit status
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod resources;
pub mod tasks;
