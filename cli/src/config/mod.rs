//! User configuration: which repository entries restore walks, skips, or
//! links as a unit.
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use validation::{ConfigValidator, ValidationWarning, check_names};

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rules for the `restore` traversal.
    pub restore: RestoreRules,
}

/// Filters applied while walking the repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestoreRules {
    /// Entry names skipped at every depth, together with their subtrees.
    pub ignore: Vec<String>,
    /// File name suffixes that are never linked.
    pub ignore_suffixes: Vec<String>,
    /// Top-level directory name prefixes linked as a single unit.
    pub whole_dir_prefixes: Vec<String>,
}

impl Default for RestoreRules {
    fn default() -> Self {
        Self {
            ignore: vec![".git".to_string(), "__pycache__".to_string()],
            ignore_suffixes: vec![".pyc".to_string()],
            whole_dir_prefixes: vec!["config__".to_string()],
        }
    }
}

impl RestoreRules {
    /// Whether an entry with this name (and its subtree) is skipped.
    #[must_use]
    pub fn is_ignored_name(&self, name: &OsStr) -> bool {
        self.ignore.iter().any(|ignored| OsStr::new(ignored) == name)
    }

    /// Whether the file name of `path` ends with an ignored suffix.
    #[must_use]
    pub fn has_ignored_suffix(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.ignore_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
    }

    /// Whether a top-level directory with this name is linked as a whole.
    #[must_use]
    pub fn is_whole_dir(&self, name: &str) -> bool {
        self.whole_dir_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
    }
}

impl ConfigValidator for RestoreRules {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        check_names("restore.ignore", &self.ignore, &mut warnings);
        check_names("restore.whole_dir_prefixes", &self.whole_dir_prefixes, &mut warnings);
        for suffix in &self.ignore_suffixes {
            if !suffix.starts_with('.') {
                warnings.push(ValidationWarning::new(
                    "restore.ignore_suffixes",
                    suffix,
                    "does not start with '.' and may match more than intended",
                ));
            }
        }
        warnings
    }
}

impl Config {
    /// Load the configuration file at `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(path)
    }

    /// Default location: `$XDG_CONFIG_HOME/dotlink/config.toml`, falling
    /// back to `<home>/.config/dotlink/config.toml`.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        Self::path_from(std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from), home)
    }

    fn path_from(xdg_config_home: Option<PathBuf>, home: &Path) -> PathBuf {
        xdg_config_home
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| home.join(".config"))
            .join("dotlink")
            .join("config.toml")
    }

    /// Return warnings for settings that look like mistakes.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        self.restore.validate()
    }
}
