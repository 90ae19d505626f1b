//! Restore: walk the repository and link every managed entry into home.
use anyhow::{Context as _, Result, anyhow};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::RestoreRules;
use crate::logging::{Action, ActionKind};
use crate::mapping::repo_name_to_home_path;
use crate::resources::LinkOutcome;
use crate::resources::symlink::SymlinkResource;

/// One link the restore pass wants to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlan {
    /// Repository entry the link points at.
    pub source: PathBuf,
    /// Home path where the link lives.
    pub target: PathBuf,
}

/// Links to place plus the entries that could not be examined.
#[derive(Debug, Default)]
pub struct RestorePlan {
    /// Links in traversal order.
    pub links: Vec<LinkPlan>,
    /// Per-entry failures; each one skips only that entry or subtree.
    pub errors: Vec<anyhow::Error>,
}

/// Compute every link for the repository at `source_root`.
///
/// Top-level entries are visited in lexical order. Directories whose name
/// carries a whole-directory prefix become a single link; other directories
/// are walked and each file inside gets its own link. Ignored names prune
/// whole subtrees, and symlinked directories inside a walked tree are
/// neither followed nor linked. An entry that cannot be read or named is
/// recorded in [`RestorePlan::errors`] and the walk moves on.
///
/// # Errors
///
/// Returns an error only if the repository root itself cannot be listed.
pub fn plan_links(source_root: &Path, home: &Path, rules: &RestoreRules) -> Result<RestorePlan> {
    let mut plan = RestorePlan::default();
    for (name, path) in sorted_entries(source_root, &mut plan.errors)? {
        if rules.is_ignored_name(&name) {
            continue;
        }
        let Some(name) = name.to_str() else {
            plan.errors.push(anyhow!(
                "entry name is not valid UTF-8: {}",
                path.display()
            ));
            continue;
        };
        let target = home.join(repo_name_to_home_path(name));

        if !path.is_dir() {
            if !rules.has_ignored_suffix(&path) {
                plan.links.push(LinkPlan {
                    source: path,
                    target,
                });
            }
            continue;
        }

        if rules.is_whole_dir(name) {
            plan.links.push(LinkPlan {
                source: path,
                target,
            });
            continue;
        }

        let mut files = Vec::new();
        collect_files(&path, rules, &mut files, &mut plan.errors);
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        for file in files {
            match file.strip_prefix(&path) {
                Ok(rel) => plan.links.push(LinkPlan {
                    target: target.join(rel),
                    source: file.clone(),
                }),
                Err(e) => plan
                    .errors
                    .push(anyhow!(e).context(format!("placing {}", file.display()))),
            }
        }
    }
    Ok(plan)
}

fn sorted_entries(
    dir: &Path,
    errors: &mut Vec<anyhow::Error>,
) -> Result<Vec<(OsString, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        match entry {
            Ok(entry) => entries.push((entry.file_name(), entry.path())),
            Err(e) => {
                errors.push(anyhow!(e).context(format!("reading entry in {}", dir.display())));
            }
        }
    }
    entries.sort();
    Ok(entries)
}

fn collect_files(
    dir: &Path,
    rules: &RestoreRules,
    out: &mut Vec<PathBuf>,
    errors: &mut Vec<anyhow::Error>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(anyhow!(e).context(format!("reading {}", dir.display())));
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(anyhow!(e).context(format!("reading entry in {}", dir.display())));
                continue;
            }
        };
        if rules.is_ignored_name(&entry.file_name()) {
            continue;
        }
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                errors.push(
                    anyhow!(e).context(format!("reading file type of {}", path.display())),
                );
                continue;
            }
        };
        if file_type.is_dir() {
            collect_files(&path, rules, out, errors);
        } else if file_type.is_symlink() && path.is_dir() {
            continue;
        } else if !rules.has_ignored_suffix(&path) {
            out.push(path);
        }
    }
}

/// Link every repository entry into the home directory.
#[derive(Debug)]
pub struct RestoreLinks;

impl Task for RestoreLinks {
    fn name(&self) -> &'static str {
        "Restore links"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let plan = plan_links(&ctx.source, &ctx.home, &ctx.config.restore)?;
        ctx.log.debug(&format!(
            "{} links planned from {}",
            plan.links.len(),
            ctx.source.display()
        ));

        let mut stats = TaskStats::default();
        for e in &plan.errors {
            ctx.log.error(&format!("{e:#}"));
            stats.errors += 1;
        }
        for link in plan.links {
            let resource = SymlinkResource::new(link.source, link.target);
            match resource.place(ctx.link_options(), &*ctx.log) {
                Ok(LinkOutcome::Linked) => stats.linked += 1,
                Ok(LinkOutcome::Skipped) => stats.already_ok += 1,
                Ok(LinkOutcome::Conflict { reason }) => {
                    ctx.log.action(
                        &Action::new(ActionKind::Conflict, &resource.target).with_reason(reason),
                        ctx.dry_run,
                    );
                    stats.conflicts += 1;
                }
                Err(e) => {
                    ctx.log
                        .error(&format!("{}: {e}", resource.description()));
                    stats.errors += 1;
                }
            }
        }
        stats.finish(ctx)
    }
}
