//! Restore command implementation.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandSetup, RunStatus};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::restore::RestoreLinks;

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if the home or repository directory cannot be resolved
/// or the configuration fails to load.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<RunStatus> {
    let ctx = CommandSetup::init(global, log, true)?;
    Ok(super::run_tasks_to_completion([&RestoreLinks as &dyn Task], &ctx, log))
}
