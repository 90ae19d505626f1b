//! Core logging types: task entries, link actions, and the [`Log`] trait.
use std::fmt;
use std::path::PathBuf;

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do (e.g., already stowed).
    Skipped,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// Task left one or more targets occupied by unrelated content.
    Conflict,
    /// Task encountered an error and could not complete.
    Failed,
}

impl TaskStatus {
    /// Whether this status makes the run exit non-zero.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Conflict | Self::Failed)
    }
}

/// Kind of filesystem action reported by the link engine and the stow flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Parent directory creation.
    MakeDir,
    /// Removal of an empty placeholder directory.
    RemoveDir,
    /// Rename of a displaced entry to its backup path.
    Backup,
    /// Symlink creation.
    Link,
    /// Target already satisfied; nothing done.
    Skip,
    /// Move of content between home and repository.
    Move,
    /// Symlink removal.
    Unlink,
    /// Target occupied; nothing done.
    Conflict,
}

impl ActionKind {
    /// Upper-case label used in console and log file output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MakeDir => "MKDIR",
            Self::RemoveDir => "RMDIR",
            Self::Backup => "BACKUP",
            Self::Link => "LINK",
            Self::Skip => "SKIP",
            Self::Move => "MOVE",
            Self::Unlink => "UNLINK",
            Self::Conflict => "CONFLICT",
        }
    }
}

/// A structured event: what happened (or would happen) to which path.
///
/// # Examples
///
/// ```
/// use dotlink::logging::{Action, ActionKind};
///
/// let action = Action::new(ActionKind::Link, "/home/u/.bashrc").with_dest("/repo/bashrc");
/// assert_eq!(action.to_string(), "LINK /home/u/.bashrc -> /repo/bashrc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What kind of action.
    pub kind: ActionKind,
    /// The path acted upon (link location, moved entry, created directory).
    pub path: PathBuf,
    /// Second path, if any (link source, move or backup destination).
    pub dest: Option<PathBuf>,
    /// Free-form detail, e.g. a conflict reason.
    pub reason: Option<String>,
}

impl Action {
    /// Create an action on `path`.
    #[must_use]
    pub fn new(kind: ActionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            dest: None,
            reason: None,
        }
    }

    /// Attach the second path.
    #[must_use]
    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Attach a detail message.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.path.display())?;
        if let Some(dest) = &self.dest {
            write!(f, " -> {}", dest.display())?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) routes everything through `tracing`;
/// tests substitute an in-memory recorder. Link and traversal code only ever
/// see this trait, never process-wide state.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Report a structured filesystem action.
    ///
    /// `dry_run` marks actions that were only planned.
    fn action(&self, action: &Action, dry_run: bool);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
