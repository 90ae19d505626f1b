//! Top-level subcommand orchestration.
pub mod restore;
pub mod stow;
pub mod unstow;
pub mod version;

use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::ConfigError;
use crate::logging::{Log, Logger};
use crate::mapping::normalize;
use crate::tasks::{self, Context, Task};

/// Environment variable naming the repository root.
pub const SOURCE_ENV: &str = "DOTLINK_ROOT";

/// Name of the repository directory searched for near the binary and in the
/// working directory.
const SOURCE_DIR_NAME: &str = "dotfiles";

/// Common command setup: resolve roots, load configuration, build the
/// task [`Context`].
#[derive(Debug)]
pub struct CommandSetup;

impl CommandSetup {
    /// Resolve home and source, load and validate configuration, and return
    /// a ready [`Context`].
    ///
    /// `require_source` makes a missing repository directory fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, the
    /// source is required but missing, or the config file cannot be loaded.
    pub fn init(global: &GlobalOpts, log: &Arc<Logger>, require_source: bool) -> Result<Context> {
        log.stage("Resolving paths");
        let cwd = std::env::current_dir().context("reading current directory")?;
        let home = canonical_if_exists(absolute_in(&cwd, &resolve_home(global)?));
        let source = canonical_if_exists(absolute_in(&cwd, &resolve_source(global)?));
        if require_source && !source.is_dir() {
            return Err(ConfigError::MissingSource(source.display().to_string()).into());
        }

        let config_path = match &global.config {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            Some(path) => path.clone(),
            None => Config::default_path(&home),
        };
        log.info(&format!("home: {}", home.display()));
        log.info(&format!("source: {}", source.display()));

        log.stage("Loading configuration");
        log.debug(&format!("config: {}", config_path.display()));
        let config = Config::load(&config_path)?;

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        if global.dry_run {
            log.dry_run("previewing changes; nothing will be modified");
        }

        Ok(Context {
            home,
            source,
            cwd,
            config: Arc::new(config),
            log: Arc::clone(log) as Arc<dyn Log>,
            dry_run: global.dry_run,
            force: global.force,
        })
    }
}

/// Anchor `path` at `cwd` when relative, then normalize lexically.
///
/// Link targets are stored as absolute paths, so a root that does not exist
/// yet must not stay relative.
fn absolute_in(cwd: &Path, path: &Path) -> PathBuf {
    normalize(&cwd.join(path))
}

fn canonical_if_exists(path: PathBuf) -> PathBuf {
    dunce::canonicalize(&path).unwrap_or(path)
}

/// Resolve the home directory from `--home` or the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingHome`] if neither is available.
pub fn resolve_home(global: &GlobalOpts) -> Result<PathBuf, ConfigError> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    home_from(global.home.as_deref(), std::env::var_os(var))
}

fn home_from(explicit: Option<&Path>, env_home: Option<OsString>) -> Result<PathBuf, ConfigError> {
    if let Some(home) = explicit {
        return Ok(home.to_path_buf());
    }
    env_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingHome)
}

/// Resolve the repository root from CLI arguments or auto-detection.
///
/// Checked in order: `--source`, `$DOTLINK_ROOT`, a `dotfiles/` directory
/// beside the checkout the binary was built in, and finally `./dotfiles`.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_source(global: &GlobalOpts) -> Result<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(source_from(
        global.source.as_deref(),
        std::env::var_os(SOURCE_ENV),
        exe_dir.as_deref(),
        &cwd,
    ))
}

fn source_from(
    explicit: Option<&Path>,
    env_root: Option<OsString>,
    exe_dir: Option<&Path>,
    cwd: &Path,
) -> PathBuf {
    if let Some(source) = explicit {
        return source.to_path_buf();
    }
    if let Some(root) = env_root.filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    if let Some(dir) = exe_dir {
        // target/release/ → checkout root, or bin/ → install root
        for candidate in [dir.join("../.."), dir.join("..")] {
            let source = candidate.join(SOURCE_DIR_NAME);
            if source.is_dir() {
                return normalize(&source);
            }
        }
    }
    cwd.join(SOURCE_DIR_NAME)
}

/// Overall outcome of a command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every task succeeded, was skipped, or only previewed changes.
    Clean,
    /// Some tasks failed or left conflicts.
    Failed {
        /// Number of failed or conflicting tasks.
        count: usize,
    },
}

impl RunStatus {
    /// Process exit code: `0` when clean, `2` otherwise.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Failed { .. } => 2,
        }
    }
}

/// Execute every task in order, print the summary, and report whether any
/// task failed.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> RunStatus {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    match log.failure_count() {
        0 => RunStatus::Clean,
        count => {
            log.error(&format!("{count} task(s) failed or left conflicts"));
            RunStatus::Failed { count }
        }
    }
}
