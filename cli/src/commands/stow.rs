//! Stow command implementation.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandSetup, RunStatus};
use crate::cli::{GlobalOpts, PathsOpts};
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::stow::StowPath;

/// Run the stow command, one task per path.
///
/// The repository directory is created on demand, so it need not exist yet.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or the
/// configuration fails to load.
pub fn run(global: &GlobalOpts, opts: &PathsOpts, log: &Arc<Logger>) -> Result<RunStatus> {
    let ctx = CommandSetup::init(global, log, false)?;
    let tasks: Vec<StowPath> = opts.paths.iter().cloned().map(StowPath::new).collect();
    Ok(super::run_tasks_to_completion(
        tasks.iter().map(|t| t as &dyn Task),
        &ctx,
        log,
    ))
}
