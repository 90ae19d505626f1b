//! Unstow: the inverse of stow.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult};
use crate::error::StowError;
use crate::logging::{Action, ActionKind};
use crate::resources::helpers::fs::{ensure_parent_dir, move_path, remove_symlink};
use crate::resources::identity::{exists_or_symlink, is_symlink, resolve};

/// Replace the managed symlink at `raw` with the repository content it
/// points at. Returns the repository path that was moved back.
///
/// # Errors
///
/// Returns a [`StowError`] if the path is missing or not a symlink, lies
/// outside home, dangles, resolves outside the repository, or a filesystem
/// call fails.
pub fn unstow(raw: &Path, ctx: &Context) -> Result<PathBuf, StowError> {
    let path = ctx.user_path(raw);
    let log = &*ctx.log;

    if !is_symlink(&path) {
        return Err(if exists_or_symlink(&path) {
            StowError::NotSymlink { path }
        } else {
            StowError::Missing { path }
        });
    }
    if !path.starts_with(&ctx.home) {
        return Err(StowError::OutsideHome {
            path,
            home: ctx.home.clone(),
        });
    }
    let Some(resolved) = resolve(&path) else {
        return Err(StowError::BrokenLink { path });
    };
    if !ctx.is_in_source(&resolved) {
        return Err(StowError::NotManaged {
            path,
            target: resolved,
        });
    }

    log.action(
        &Action::new(ActionKind::Unlink, &path).with_dest(&resolved),
        ctx.dry_run,
    );
    if !ctx.dry_run {
        remove_symlink(&path)?;
    }
    ensure_parent_dir(&path, ctx.dry_run, log)?;
    log.action(
        &Action::new(ActionKind::Move, &resolved).with_dest(&path),
        ctx.dry_run,
    );
    if !ctx.dry_run {
        move_path(&resolved, &path)?;
    }
    Ok(resolved)
}

/// Task wrapper around [`unstow`] for one user-supplied path.
#[derive(Debug)]
pub struct UnstowPath {
    path: PathBuf,
    name: String,
}

impl UnstowPath {
    /// Create a task for `path` as typed by the user.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let name = format!("unstow {}", path.display());
        Self { path, name }
    }
}

impl Task for UnstowPath {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        unstow(&self.path, ctx)?;
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}
