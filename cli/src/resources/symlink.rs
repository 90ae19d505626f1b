//! Symlink resource: the link engine that makes one home path point at one
//! repository entry.
use std::fs;
use std::path::{Path, PathBuf};

use super::backup::{allocate_backup_path, timestamp};
use super::helpers::fs::{create_symlink, ensure_parent_dir, is_empty_dir};
use super::identity::{exists_or_symlink, is_same_target};
use super::{LinkOptions, LinkOutcome, ResourceState};
use crate::error::LinkError;
use crate::logging::{Action, ActionKind, Log};

/// A symlink resource that can be checked and placed.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Human-readable description of this link.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Classify what currently occupies the target path.
    #[must_use]
    pub fn current_state(&self) -> ResourceState {
        if is_same_target(&self.target, &self.source) {
            return ResourceState::Correct;
        }
        if !exists_or_symlink(&self.target) {
            return ResourceState::Missing;
        }
        if self.source.is_dir() && is_empty_dir(&self.target) {
            return ResourceState::Placeholder;
        }
        ResourceState::Occupied {
            current: describe_occupant(&self.target),
        }
    }

    /// Make the target a symlink to the source.
    ///
    /// Occupied targets are left alone unless `opts.force` is set, in which
    /// case they are renamed to a fresh backup path first. Under
    /// `opts.dry_run` every step is reported but nothing is changed, and the
    /// returned outcome is the one a real run would produce.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent path component is not a directory or a
    /// filesystem call fails.
    pub fn place(&self, opts: LinkOptions, log: &dyn Log) -> Result<LinkOutcome, LinkError> {
        match self.current_state() {
            ResourceState::Correct => {
                log.action(
                    &Action::new(ActionKind::Skip, &self.target).with_dest(&self.source),
                    opts.dry_run,
                );
                return Ok(LinkOutcome::Skipped);
            }
            ResourceState::Placeholder => {
                log.action(
                    &Action::new(ActionKind::RemoveDir, &self.target)
                        .with_reason("empty placeholder"),
                    opts.dry_run,
                );
                if !opts.dry_run {
                    fs::remove_dir(&self.target)
                        .map_err(LinkError::io("remove directory", &self.target))?;
                }
            }
            ResourceState::Occupied { current } => {
                if !opts.force {
                    return Ok(LinkOutcome::Conflict { reason: current });
                }
                backup_existing(&self.target, opts.dry_run, log)?;
            }
            ResourceState::Missing => {}
        }

        ensure_parent_dir(&self.target, opts.dry_run, log)?;
        log.action(
            &Action::new(ActionKind::Link, &self.target).with_dest(&self.source),
            opts.dry_run,
        );
        if !opts.dry_run {
            create_symlink(&self.source, &self.target)?;
        }
        Ok(LinkOutcome::Linked)
    }
}

/// Rename `path` to a fresh backup path and return that path.
///
/// Under `dry_run` the backup is reported and the would-be path returned,
/// but nothing is renamed.
///
/// # Errors
///
/// Returns an error if the rename fails.
pub fn backup_existing(path: &Path, dry_run: bool, log: &dyn Log) -> Result<PathBuf, LinkError> {
    let backup = allocate_backup_path(path, &timestamp());
    log.action(
        &Action::new(ActionKind::Backup, path).with_dest(&backup),
        dry_run,
    );
    if !dry_run {
        fs::rename(path, &backup).map_err(LinkError::io("back up", path))?;
    }
    Ok(backup)
}

fn describe_occupant(path: &Path) -> String {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_symlink() => fs::read_link(path).map_or_else(
            |_| "target is a symlink".to_string(),
            |dest| format!("target is a symlink to {}", dest.display()),
        ),
        Ok(meta) if meta.is_dir() => "target is a directory".to_string(),
        Ok(_) => "target is a regular file".to_string(),
        Err(e) => format!("target is unreadable: {e}"),
    }
}
