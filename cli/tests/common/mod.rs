// Shared helpers for integration tests.
//
// Provides a temporary home directory and dotfiles repository plus a fluent
// builder, so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotlink::cli::GlobalOpts;
use dotlink::logging::Logger;

/// An isolated home directory and repository backed by a
/// [`tempfile::TempDir`].
///
/// Paths are canonical so they compare equal to what the commands resolve.
pub struct TestEnv {
    _dir: tempfile::TempDir,
    /// Stand-in home directory.
    pub home: PathBuf,
    /// Dotfiles repository root.
    pub source: PathBuf,
    /// Configuration file passed via `--config`.
    pub config: PathBuf,
}

impl TestEnv {
    /// Create an empty home, an empty repository, and an empty config file.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let home = root.join("home");
        let source = root.join("dotfiles");
        let config = root.join("config.toml");
        std::fs::create_dir(&home).expect("create home");
        std::fs::create_dir(&source).expect("create repository");
        std::fs::write(&config, "").expect("write config");
        Self {
            _dir: dir,
            home,
            source,
            config,
        }
    }

    /// Global options pointing every root at this environment.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            home: Some(self.home.clone()),
            source: Some(self.source.clone()),
            config: Some(self.config.clone()),
            ..GlobalOpts::default()
        }
    }

    /// Global options for a dry run.
    pub fn dry_run(&self) -> GlobalOpts {
        GlobalOpts {
            dry_run: true,
            ..self.global()
        }
    }

    /// Global options for a forced run.
    pub fn force(&self) -> GlobalOpts {
        GlobalOpts {
            force: true,
            ..self.global()
        }
    }

    /// A logger that writes no log file.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::new(Logger::with_log_file(None))
    }

    /// Read a file below home as a string.
    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home.join(rel)).expect("read home file")
    }

    /// Where the symlink at `home/rel` points, if it is one.
    pub fn link_target(&self, rel: &str) -> Option<PathBuf> {
        std::fs::read_link(self.home.join(rel)).ok()
    }

    /// Names of entries directly below `dir` starting with `prefix`.
    pub fn entries_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .filter_map(|e| e.ok()?.file_name().into_string().ok())
            .filter(|n| n.starts_with(prefix))
            .collect();
        names.sort();
        names
    }
}

/// Express the absolute `path` relative to the process working directory,
/// climbing with `..` as needed.
pub fn relative_to_cwd(path: &Path) -> PathBuf {
    let cwd = dunce::canonicalize(std::env::current_dir().expect("read cwd")).expect("canonical cwd");
    let mut rel = PathBuf::new();
    let mut base = cwd.as_path();
    while !path.starts_with(base) {
        rel.push("..");
        base = base.parent().expect("cwd has a common ancestor with path");
    }
    rel.push(path.strip_prefix(base).expect("path under ancestor"));
    rel
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Fluent builder for [`TestEnv`].
pub struct TestEnvBuilder {
    env: TestEnv,
}

impl TestEnvBuilder {
    /// Begin building a new, empty environment.
    pub fn new() -> Self {
        Self {
            env: TestEnv::new(),
        }
    }

    /// Write `contents` to `rel` inside the repository.
    pub fn with_repo_file(self, rel: &str, contents: &str) -> Self {
        write_file(&self.env.source.join(rel), contents);
        self
    }

    /// Create an empty directory `rel` inside the repository.
    pub fn with_repo_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.env.source.join(rel)).expect("create repository dir");
        self
    }

    /// Write `contents` to `rel` inside home.
    pub fn with_home_file(self, rel: &str, contents: &str) -> Self {
        write_file(&self.env.home.join(rel), contents);
        self
    }

    /// Create an empty directory `rel` inside home.
    pub fn with_home_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.env.home.join(rel)).expect("create home dir");
        self
    }

    /// Replace the configuration file contents.
    pub fn with_config(self, contents: &str) -> Self {
        std::fs::write(&self.env.config, contents).expect("write config");
        self
    }

    /// Finish building and return the environment.
    pub fn build(self) -> TestEnv {
        self.env
    }
}
