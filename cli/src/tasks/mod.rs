//! Named tasks that orchestrate link changes.
mod context;
pub mod restore;
pub mod stow;
pub mod unstow;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
    /// Task finished but left targets occupied by unrelated content.
    Conflict(String),
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot complete, such as when the
    /// repository cannot be read or a requested path is rejected.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Ok(TaskResult::Conflict(reason)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Conflict, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Counters for tasks that place many links.
///
/// # Examples
///
/// ```
/// use dotlink::tasks::TaskStats;
///
/// let stats = TaskStats { linked: 3, already_ok: 10, ..TaskStats::default() };
/// assert_eq!(stats.summary(false), "3 linked, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would link, 10 already ok");
/// ```
///
/// Conflicts and errors are only mentioned when present:
///
/// ```
/// use dotlink::tasks::TaskStats;
///
/// let stats = TaskStats { linked: 1, already_ok: 2, conflicts: 3, errors: 0 };
/// assert_eq!(stats.summary(false), "1 linked, 2 already ok, 3 conflicts");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of links created.
    pub linked: u32,
    /// Number of targets already pointing at their source.
    pub already_ok: u32,
    /// Number of targets occupied by unrelated content.
    pub conflicts: u32,
    /// Number of entries that failed outright.
    pub errors: u32,
}

impl TaskStats {
    /// Format the summary string (e.g. "3 linked, 10 already ok, 1 conflicts").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would link" } else { "linked" };
        let mut out = format!("{} {verb}, {} already ok", self.linked, self.already_ok);
        if self.conflicts > 0 {
            out.push_str(&format!(", {} conflicts", self.conflicts));
        }
        if self.errors > 0 {
            out.push_str(&format!(", {} errors", self.errors));
        }
        out
    }

    /// Log the summary and return the appropriate `TaskResult`.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        let summary = self.summary(ctx.dry_run);
        ctx.log.info(&summary);
        if self.errors > 0 {
            anyhow::bail!("{summary}");
        }
        if self.conflicts > 0 {
            return Ok(TaskResult::Conflict(format!(
                "{} conflicts; rerun with --force to back up and replace",
                self.conflicts
            )));
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

/// Shared helpers for unit tests.
///
/// Provides an in-memory [`Log`](crate::logging::Log) and a temporary
/// home/source pair so each test module does not have to duplicate
/// boilerplate.
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::new_without_default)]
pub mod test_helpers {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use crate::config::Config;
    use crate::logging::{Action, ActionKind, Log, TaskEntry, TaskStatus};

    use super::Context;

    /// A [`Log`] that records everything in memory.
    #[derive(Debug, Default)]
    pub struct RecordingLog {
        messages: Mutex<Vec<String>>,
        actions: Mutex<Vec<Action>>,
        tasks: Mutex<Vec<TaskEntry>>,
    }

    impl RecordingLog {
        /// All messages logged so far, prefixed with their level.
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        /// All actions reported so far.
        pub fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }

        /// Kinds of all actions reported so far, in order.
        pub fn action_kinds(&self) -> Vec<ActionKind> {
            self.actions().iter().map(|a| a.kind).collect()
        }

        /// All recorded task entries.
        pub fn tasks(&self) -> Vec<TaskEntry> {
            self.tasks.lock().unwrap().clone()
        }

        fn push(&self, level: &str, msg: &str) {
            self.messages.lock().unwrap().push(format!("{level}: {msg}"));
        }
    }

    impl Log for RecordingLog {
        fn stage(&self, msg: &str) {
            self.push("stage", msg);
        }
        fn info(&self, msg: &str) {
            self.push("info", msg);
        }
        fn debug(&self, msg: &str) {
            self.push("debug", msg);
        }
        fn warn(&self, msg: &str) {
            self.push("warn", msg);
        }
        fn error(&self, msg: &str) {
            self.push("error", msg);
        }
        fn dry_run(&self, msg: &str) {
            self.push("dry_run", msg);
        }
        fn action(&self, action: &Action, _dry_run: bool) {
            self.actions.lock().unwrap().push(action.clone());
        }
        fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
            self.tasks.lock().unwrap().push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Temporary `home/` and `repo/` directories with a recording logger.
    ///
    /// Paths are canonicalized so comparisons with resolved link targets
    /// hold on platforms whose temp dir sits behind a symlink.
    #[derive(Debug)]
    pub struct Sandbox {
        _dir: tempfile::TempDir,
        /// Fake home directory.
        pub home: PathBuf,
        /// Fake repository root.
        pub source: PathBuf,
        /// Logger handed to every context built from this sandbox.
        pub log: Arc<RecordingLog>,
    }

    impl Sandbox {
        /// Create empty `home/` and `repo/` directories.
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dunce::canonicalize(dir.path()).unwrap();
            let home = root.join("home");
            let source = root.join("repo");
            std::fs::create_dir_all(&home).unwrap();
            std::fs::create_dir_all(&source).unwrap();
            Self {
                _dir: dir,
                home,
                source,
                log: Arc::new(RecordingLog::default()),
            }
        }

        /// Write `contents` to `rel` under the repository, creating parents.
        pub fn repo_file(&self, rel: &str, contents: &str) -> PathBuf {
            write_file(&self.source.join(rel), contents)
        }

        /// Write `contents` to `rel` under home, creating parents.
        pub fn home_file(&self, rel: &str, contents: &str) -> PathBuf {
            write_file(&self.home.join(rel), contents)
        }

        /// A non-dry-run, non-force context over this sandbox.
        pub fn context(&self) -> Context {
            Context {
                home: self.home.clone(),
                source: self.source.clone(),
                cwd: self.home.clone(),
                config: Arc::new(Config::default()),
                log: Arc::clone(&self.log) as Arc<dyn Log>,
                dry_run: false,
                force: false,
            }
        }
    }

    fn write_file(path: &std::path::Path, contents: &str) -> PathBuf {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
        path.to_path_buf()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::test_helpers::Sandbox;
    use super::*;

    struct Fixed(Result<TaskResult, String>);

    impl Task for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn status_after(result: Result<TaskResult, String>) -> TaskStatus {
        let sb = Sandbox::new();
        execute(&Fixed(result), &sb.context());
        sb.log.tasks()[0].status
    }

    #[test]
    fn execute_records_each_result_kind() {
        assert_eq!(status_after(Ok(TaskResult::Ok)), TaskStatus::Ok);
        assert_eq!(
            status_after(Ok(TaskResult::Skipped("nothing".into()))),
            TaskStatus::Skipped
        );
        assert_eq!(status_after(Ok(TaskResult::DryRun)), TaskStatus::DryRun);
        assert_eq!(
            status_after(Ok(TaskResult::Conflict("1 conflicts".into()))),
            TaskStatus::Conflict
        );
        assert_eq!(status_after(Err("boom".into())), TaskStatus::Failed);
    }

    #[test]
    fn execute_logs_errors() {
        let sb = Sandbox::new();
        execute(&Fixed(Err("boom".into())), &sb.context());
        assert!(sb.log.messages().contains(&"error: fixed: boom".to_string()));
    }

    #[test]
    fn summary_mentions_errors() {
        let stats = TaskStats {
            linked: 0,
            already_ok: 1,
            conflicts: 0,
            errors: 2,
        };
        assert_eq!(stats.summary(true), "0 would link, 1 already ok, 2 errors");
    }

    #[test]
    fn finish_prefers_errors_over_conflicts() {
        let sb = Sandbox::new();
        let stats = TaskStats {
            conflicts: 1,
            errors: 1,
            ..TaskStats::default()
        };
        assert!(stats.finish(&sb.context()).is_err());
    }

    #[test]
    fn finish_reports_conflicts() {
        let sb = Sandbox::new();
        let stats = TaskStats {
            conflicts: 2,
            ..TaskStats::default()
        };
        assert!(matches!(
            stats.finish(&sb.context()).unwrap(),
            TaskResult::Conflict(_)
        ));
    }

    #[test]
    fn finish_in_dry_run_is_dry_run() {
        let sb = Sandbox::new();
        let mut ctx = sb.context();
        ctx.dry_run = true;
        assert_eq!(
            TaskStats::default().finish(&ctx).unwrap(),
            TaskResult::DryRun
        );
    }
}
