//! Stow: move a home entry into the repository and leave a link behind.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult};
use crate::error::StowError;
use crate::logging::{Action, ActionKind};
use crate::mapping::home_path_to_repo_name;
use crate::resources::LinkOutcome;
use crate::resources::helpers::fs::{create_symlink, ensure_parent_dir, move_path};
use crate::resources::identity::{exists_or_symlink, is_same_target, is_symlink, resolve};
use crate::resources::symlink::{SymlinkResource, backup_existing};

/// Adopt `raw` into the repository.
///
/// The path is expanded and normalized, checked to lie under home, mapped to
/// its repository location, moved there, and replaced by a symlink. A path
/// that already links into the repository is left alone. If the repository
/// location is taken, the result is a conflict unless `ctx.force` is set, in
/// which case the repository copy is backed up first.
///
/// # Errors
///
/// Returns a [`StowError`] if the path is missing, outside home, inside or
/// above the repository, a dangling or foreign symlink, has no repository name, or a
/// filesystem call fails.
pub fn stow(raw: &Path, ctx: &Context) -> Result<LinkOutcome, StowError> {
    let path = ctx.user_path(raw);
    let log = &*ctx.log;

    if !exists_or_symlink(&path) {
        return Err(StowError::Missing { path });
    }
    if !path.starts_with(&ctx.home) {
        return Err(StowError::OutsideHome {
            path,
            home: ctx.home.clone(),
        });
    }
    if ctx.is_in_source(&path) {
        return Err(StowError::InsideSource { path });
    }
    if ctx.source.starts_with(&path) {
        return Err(StowError::ContainsSource { path });
    }
    if is_symlink(&path) {
        return match resolve(&path) {
            None => Err(StowError::BrokenLink { path }),
            Some(resolved) if ctx.is_in_source(&resolved) => {
                log.action(
                    &Action::new(ActionKind::Skip, &path)
                        .with_dest(&resolved)
                        .with_reason("already stowed"),
                    ctx.dry_run,
                );
                Ok(LinkOutcome::Skipped)
            }
            Some(_) => Err(StowError::ForeignSymlink { path }),
        };
    }

    let dest = ctx.source.join(home_path_to_repo_name(&path, &ctx.home)?);

    if is_same_target(&path, &dest) {
        return SymlinkResource::new(dest, path)
            .place(ctx.link_options(), log)
            .map_err(StowError::from);
    }
    if exists_or_symlink(&dest) {
        if !ctx.force {
            return Ok(LinkOutcome::Conflict {
                reason: format!("repository already has {}", dest.display()),
            });
        }
        backup_existing(&dest, ctx.dry_run, log)?;
    }

    ensure_parent_dir(&dest, ctx.dry_run, log)?;
    log.action(
        &Action::new(ActionKind::Move, &path).with_dest(&dest),
        ctx.dry_run,
    );
    log.action(
        &Action::new(ActionKind::Link, &path).with_dest(&dest),
        ctx.dry_run,
    );
    if !ctx.dry_run {
        move_path(&path, &dest)?;
        create_symlink(&dest, &path)?;
    }
    Ok(LinkOutcome::Linked)
}

/// Task wrapper around [`stow`] for one user-supplied path.
#[derive(Debug)]
pub struct StowPath {
    path: PathBuf,
    name: String,
}

impl StowPath {
    /// Create a task for `path` as typed by the user.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let name = format!("stow {}", path.display());
        Self { path, name }
    }
}

impl Task for StowPath {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        match stow(&self.path, ctx)? {
            LinkOutcome::Linked if ctx.dry_run => Ok(TaskResult::DryRun),
            LinkOutcome::Linked => Ok(TaskResult::Ok),
            LinkOutcome::Skipped => Ok(TaskResult::Skipped("already stowed".to_string())),
            LinkOutcome::Conflict { reason } => {
                ctx.log.action(
                    &Action::new(ActionKind::Conflict, ctx.user_path(&self.path))
                        .with_reason(reason.as_str()),
                    ctx.dry_run,
                );
                Ok(TaskResult::Conflict(reason))
            }
        }
    }
}
