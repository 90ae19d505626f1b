//! Naming convention between repository entries and home paths.
//!
//! A top-level repository entry name is split on `__`; the first segment
//! gains a leading dot and the segments become nested directories:
//!
//! | repository name       | home path              |
//! |-----------------------|------------------------|
//! | `bashrc`              | `~/.bashrc`            |
//! | `config__qtile`       | `~/.config/qtile`      |
//! | `local__bin__scripts` | `~/.local/bin/scripts` |
//!
//! The inverse direction (used by stow) recognises the prefixes listed in
//! [`SpecialPrefix`] and otherwise strips the leading dot.
use std::path::{Component, Path, PathBuf};

use crate::error::MappingError;

/// Separator standing in for `/` inside a repository entry name.
pub const SEGMENT_SEPARATOR: &str = "__";

/// Home locations that fold into a single `__`-joined repository entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialPrefix {
    /// `~/.config/<app>/...` ↔ `config__<app>/...`
    ConfigApp,
    /// `~/.local/bin/scripts/...` ↔ `local__bin__scripts/...`
    LocalBinScripts,
}

impl SpecialPrefix {
    /// Every special prefix, checked in order.
    pub const ALL: [Self; 2] = [Self::ConfigApp, Self::LocalBinScripts];

    /// Fixed home-relative components identifying this prefix.
    #[must_use]
    pub const fn home_components(self) -> &'static [&'static str] {
        match self {
            Self::ConfigApp => &[".config"],
            Self::LocalBinScripts => &[".local", "bin", "scripts"],
        }
    }

    /// Repository entry name for this prefix; `app` is folded in for
    /// [`SpecialPrefix::ConfigApp`].
    #[must_use]
    pub fn entry_name(self, app: Option<&str>) -> String {
        match (self, app) {
            (Self::ConfigApp, Some(app)) => format!("config{SEGMENT_SEPARATOR}{app}"),
            (Self::ConfigApp, None) => "config".to_string(),
            (Self::LocalBinScripts, _) => ["local", "bin", "scripts"].join(SEGMENT_SEPARATOR),
        }
    }

    /// Return the components following this prefix, or `None` if `parts`
    /// does not start with it.
    fn strip<'p, 's>(self, parts: &'p [&'s str]) -> Option<&'p [&'s str]> {
        let fixed = self.home_components();
        let matches = parts.len() >= fixed.len()
            && parts.iter().zip(fixed).all(|(part, expected)| part == expected);
        if matches { parts.get(fixed.len()..) } else { None }
    }
}

/// Map a top-level repository entry name to its home-relative path.
///
/// ```
/// use std::path::PathBuf;
/// use dotlink::mapping::repo_name_to_home_path;
///
/// assert_eq!(repo_name_to_home_path("bashrc"), PathBuf::from(".bashrc"));
/// assert_eq!(repo_name_to_home_path("config__qtile"), PathBuf::from(".config/qtile"));
/// ```
#[must_use]
pub fn repo_name_to_home_path(name: &str) -> PathBuf {
    let mut segments = name.split(SEGMENT_SEPARATOR);
    let mut path = PathBuf::new();
    if let Some(first) = segments.next() {
        path.push(format!(".{first}"));
    }
    for segment in segments {
        path.push(segment);
    }
    path
}

/// Map an absolute path under `home` to its repository-relative path.
///
/// `home_path` must already be absolute and lexically normalized (see
/// [`normalize`]); symlinks are not resolved.
///
/// # Errors
///
/// Returns a [`MappingError`] if the path is not under `home`, is `home`
/// itself, is not hidden, is a bare `~/.config`, or is not valid UTF-8.
pub fn home_path_to_repo_name(home_path: &Path, home: &Path) -> Result<PathBuf, MappingError> {
    let rel = home_path
        .strip_prefix(home)
        .map_err(|_| MappingError::OutsideHome {
            path: home_path.to_path_buf(),
        })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        let Component::Normal(part) = component else {
            return Err(MappingError::OutsideHome {
                path: home_path.to_path_buf(),
            });
        };
        let part = part.to_str().ok_or_else(|| MappingError::NonUtf8 {
            path: home_path.to_path_buf(),
        })?;
        parts.push(part);
    }

    let Some(top) = parts.first() else {
        return Err(MappingError::HomeRoot);
    };
    let Some(clean_top) = top
        .strip_prefix('.')
        .filter(|rest| !rest.is_empty() && *rest != "." && *rest != "..")
    else {
        return Err(MappingError::NotHidden {
            path: home_path.to_path_buf(),
        });
    };

    for prefix in SpecialPrefix::ALL {
        let Some(rest) = prefix.strip(&parts) else {
            continue;
        };
        return match prefix {
            SpecialPrefix::ConfigApp => match rest.split_first() {
                Some((app, rest)) => Ok(join_entry(&prefix.entry_name(Some(app)), rest)),
                None => Err(MappingError::BareConfig {
                    path: home_path.to_path_buf(),
                }),
            },
            SpecialPrefix::LocalBinScripts => Ok(join_entry(&prefix.entry_name(None), rest)),
        };
    }

    Ok(join_entry(clean_top, parts.get(1..).unwrap_or_default()))
}

fn join_entry(entry: &str, rest: &[&str]) -> PathBuf {
    let mut path = PathBuf::from(entry);
    path.extend(rest);
    path
}

/// Normalize a path lexically: drop `.` components and fold `..` into its
/// parent without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
