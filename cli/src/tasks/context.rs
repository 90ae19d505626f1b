//! Execution context shared by every task.
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::logging::Log;
use crate::mapping::normalize;
use crate::resources::LinkOptions;

/// Shared context for task execution.
pub struct Context {
    /// Home directory links are created under.
    pub home: PathBuf,
    /// Repository root holding the managed entries.
    pub source: PathBuf,
    /// Working directory relative user paths are resolved against.
    pub cwd: PathBuf,
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Whether occupied targets are backed up and replaced.
    pub force: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("home", &self.home)
            .field("source", &self.source)
            .field("cwd", &self.cwd)
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("force", &self.force)
            .finish()
    }
}

impl Context {
    /// Options for the link engine derived from the run flags.
    #[must_use]
    pub const fn link_options(&self) -> LinkOptions {
        LinkOptions {
            dry_run: self.dry_run,
            force: self.force,
        }
    }

    /// Turn a path typed by the user into an absolute, lexically normalized
    /// path: a leading `~` becomes the home directory and relative paths are
    /// taken from the working directory. Symlinks are not resolved.
    #[must_use]
    pub fn user_path(&self, raw: &Path) -> PathBuf {
        let mut components = raw.components();
        let expanded = match components.next() {
            Some(Component::Normal(first)) if first == "~" => self.home.join(components.as_path()),
            _ => raw.to_path_buf(),
        };
        if expanded.is_absolute() {
            normalize(&expanded)
        } else {
            normalize(&self.cwd.join(expanded))
        }
    }

    /// Whether `path` lies strictly inside the source root.
    #[must_use]
    pub fn is_in_source(&self, path: &Path) -> bool {
        path != self.source && path.starts_with(&self.source)
    }
}
