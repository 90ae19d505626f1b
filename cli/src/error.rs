//! Domain-specific error types for the dotlink engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors while tasks and command handlers at
//! the CLI boundary convert them to [`anyhow::Error`] via the standard `?`
//! operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError    config file, home and source resolution (fatal pre-flight)
//! MappingError   home path → repository name translation
//! LinkError      filesystem mutation while placing a link
//! StowError      per-path stow/unstow failures
//! ├── Mapping(MappingError)
//! └── Link(LinkError)
//! ```
//!
//! Conflicts are not errors: an occupied target is an expected
//! outcome, reported through [`LinkOutcome::Conflict`](crate::resources::LinkOutcome).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while loading configuration and resolving roots.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidSyntax {
        /// Path to the offending file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A config file given explicitly on the command line does not exist.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Neither `--home` nor the home environment variable is available.
    #[error("Cannot determine home directory: pass --home or set HOME")]
    MissingHome,

    /// The source directory does not exist.
    #[error("Source directory does not exist: {0}")]
    MissingSource(String),
}

/// Errors that arise when translating a home path into a repository name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The path does not lie under the home directory.
    #[error("path is not under the home directory: {}", .path.display())]
    OutsideHome {
        /// The rejected path.
        path: PathBuf,
    },

    /// The home directory itself has no repository name.
    #[error("cannot map the home directory itself")]
    HomeRoot,

    /// The top-level component under home is not dot-prefixed.
    #[error("refusing to stow non-hidden path under home: {}", .path.display())]
    NotHidden {
        /// The rejected path.
        path: PathBuf,
    },

    /// `~/.config` was given without an application directory.
    #[error("expected ~/.config/<app>/..., got {}", .path.display())]
    BareConfig {
        /// The rejected path.
        path: PathBuf,
    },

    /// A path component is not valid UTF-8 and cannot become part of a name.
    #[error("path is not valid UTF-8: {}", .path.display())]
    NonUtf8 {
        /// The rejected path.
        path: PathBuf,
    },
}

/// Errors that arise while mutating the filesystem to place a link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A path component needed as a directory is occupied by something else.
    ///
    /// Not resolvable with `--force`.
    #[error("cannot create directory; path exists and is not a directory: {}", .path.display())]
    Structural {
        /// The offending component.
        path: PathBuf,
    },

    /// A filesystem call failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// Short description of the attempted operation (e.g. `"rename"`).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl LinkError {
    /// Build a closure mapping an [`std::io::Error`] into [`LinkError::Io`].
    pub(crate) fn io(action: &'static str, path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// Errors that reject a single stow or unstow argument.
#[derive(Error, Debug)]
pub enum StowError {
    /// The path neither exists nor is a symlink.
    #[error("missing path: {}", .path.display())]
    Missing {
        /// The requested path.
        path: PathBuf,
    },

    /// The path lies outside the home directory.
    #[error("refusing path outside {}: {}", .home.display(), .path.display())]
    OutsideHome {
        /// The requested path.
        path: PathBuf,
        /// The home directory in effect.
        home: PathBuf,
    },

    /// The path is a symlink that does not point into the repository.
    #[error("refusing to stow symlink path (pass the real file or directory): {}", .path.display())]
    ForeignSymlink {
        /// The requested path.
        path: PathBuf,
    },

    /// The path lies inside the repository itself.
    #[error("refusing path inside the source directory: {}", .path.display())]
    InsideSource {
        /// The requested path.
        path: PathBuf,
    },

    /// The path is the repository or one of its ancestors.
    #[error("refusing path that contains the source directory: {}", .path.display())]
    ContainsSource {
        /// The requested path.
        path: PathBuf,
    },

    /// The path is a dangling symlink.
    #[error("broken symlink: {}", .path.display())]
    BrokenLink {
        /// The requested path.
        path: PathBuf,
    },

    /// Unstow was given something other than a symlink.
    #[error("not a symlink: {}", .path.display())]
    NotSymlink {
        /// The requested path.
        path: PathBuf,
    },

    /// Unstow was given a symlink whose target lies outside the repository.
    #[error("not managed by this tool: {} -> {}", .path.display(), .target.display())]
    NotManaged {
        /// The requested symlink.
        path: PathBuf,
        /// Where it resolves to.
        target: PathBuf,
    },

    /// The home path has no repository name.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Moving or linking failed.
    #[error(transparent)]
    Link(#[from] LinkError),
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: "/conf/config.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/conf/config.toml"));
        assert!(e.to_string().contains("IO error reading config file"));
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: "x".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn mapping_error_not_hidden_display() {
        let e = MappingError::NotHidden {
            path: PathBuf::from("/home/u/Documents"),
        };
        assert_eq!(
            e.to_string(),
            "refusing to stow non-hidden path under home: /home/u/Documents"
        );
    }

    #[test]
    fn link_error_structural_display() {
        let e = LinkError::Structural {
            path: PathBuf::from("/home/u/.config"),
        };
        assert!(e.to_string().contains("not a directory"));
        assert!(e.to_string().contains("/home/u/.config"));
    }

    #[test]
    fn link_error_io_helper_keeps_action_and_path() {
        let e = LinkError::io("rename", std::path::Path::new("/a"))(io::Error::other("boom"));
        assert_eq!(e.to_string(), "rename /a: boom");
    }

    #[test]
    fn stow_error_wraps_mapping_transparently() {
        let e: StowError = MappingError::HomeRoot.into();
        assert_eq!(e.to_string(), "cannot map the home directory itself");
    }

    #[test]
    fn stow_error_not_managed_display() {
        let e = StowError::NotManaged {
            path: PathBuf::from("/home/u/.vimrc"),
            target: PathBuf::from("/etc/vimrc"),
        };
        assert_eq!(
            e.to_string(),
            "not managed by this tool: /home/u/.vimrc -> /etc/vimrc"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<MappingError>();
        assert_send_sync::<LinkError>();
        assert_send_sync::<StowError>();
    }

    #[test]
    fn stow_error_converts_to_anyhow() {
        let e = StowError::Missing {
            path: PathBuf::from("/x"),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
