//! Unstow command implementation.
use anyhow::Result;
use std::sync::Arc;

use super::{CommandSetup, RunStatus};
use crate::cli::{GlobalOpts, PathsOpts};
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::unstow::UnstowPath;

/// Run the unstow command, one task per path.
///
/// # Errors
///
/// Returns an error if the home or repository directory cannot be resolved
/// or the configuration fails to load.
pub fn run(global: &GlobalOpts, opts: &PathsOpts, log: &Arc<Logger>) -> Result<RunStatus> {
    let ctx = CommandSetup::init(global, log, true)?;
    let tasks: Vec<UnstowPath> = opts.paths.iter().cloned().map(UnstowPath::new).collect();
    Ok(super::run_tasks_to_completion(
        tasks.iter().map(|t| t as &dyn Task),
        &ctx,
        log,
    ))
}
