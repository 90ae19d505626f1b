//! File-system helpers shared by the link engine and the stow flow.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::LinkError;
use crate::logging::{Action, ActionKind, Log};

/// Ensure `dir` exists as a directory, creating it and any missing ancestors.
///
/// The nearest existing ancestor must be a directory (or a symlink to one);
/// anything else is a [`LinkError::Structural`] that `--force` cannot fix.
/// Reports a `MKDIR` action when something is (or would be) created.
///
/// # Errors
///
/// Returns an error on a structural blocker or if creation fails.
pub fn ensure_dir(dir: &Path, dry_run: bool, log: &dyn Log) -> Result<(), LinkError> {
    let mut missing = false;
    for ancestor in dir.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        if ancestor.symlink_metadata().is_ok() {
            if !ancestor.is_dir() {
                return Err(LinkError::Structural {
                    path: ancestor.to_path_buf(),
                });
            }
            break;
        }
        missing = true;
    }
    if !missing {
        return Ok(());
    }

    log.action(&Action::new(ActionKind::MakeDir, dir), dry_run);
    if !dry_run {
        fs::create_dir_all(dir).map_err(LinkError::io("create directory", dir))?;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists; see [`ensure_dir`].
///
/// # Errors
///
/// Returns an error on a structural blocker or if creation fails.
pub fn ensure_parent_dir(path: &Path, dry_run: bool, log: &dyn Log) -> Result<(), LinkError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent, dry_run, log),
        _ => Ok(()),
    }
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> Result<(), LinkError> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);

    #[cfg(windows)]
    let result = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };

    result.map_err(LinkError::io("create symlink", link))
}

/// Remove a symlink without touching what it points to.
///
/// On Windows, directory symlinks must be removed with `remove_dir`.
///
/// # Errors
///
/// Returns an error if the link cannot be removed.
pub fn remove_symlink(path: &Path) -> Result<(), LinkError> {
    let meta = fs::symlink_metadata(path).map_err(LinkError::io("read metadata", path))?;
    if is_dir_like(&meta) {
        fs::remove_dir(path).map_err(LinkError::io("remove symlink", path))
    } else {
        fs::remove_file(path).map_err(LinkError::io("remove symlink", path))
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Move `from` to `to`, falling back to copy-then-delete when the two paths
/// are on different filesystems.
///
/// # Errors
///
/// Returns an error if the rename fails for another reason, or if the
/// fallback copy or cleanup fails.
pub fn move_path(from: &Path, to: &Path) -> Result<(), LinkError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            copy_tree(from, to)?;
            remove_tree(from)
        }
        Err(e) => Err(LinkError::io("rename", from)(e)),
    }
}

/// Recursively copy `src` to `dst`, recreating symlinks rather than
/// following them.
///
/// # Errors
///
/// Returns an error if any entry cannot be read or written.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), LinkError> {
    let meta = fs::symlink_metadata(src).map_err(LinkError::io("read metadata", src))?;
    if meta.is_symlink() {
        let target = fs::read_link(src).map_err(LinkError::io("read link", src))?;
        create_symlink(&target, dst)
    } else if meta.is_dir() {
        fs::create_dir(dst).map_err(LinkError::io("create directory", dst))?;
        for entry in fs::read_dir(src).map_err(LinkError::io("read directory", src))? {
            let entry = entry.map_err(LinkError::io("read directory", src))?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst).map_err(LinkError::io("copy", src))?;
        Ok(())
    }
}

fn remove_tree(path: &Path) -> Result<(), LinkError> {
    let meta = fs::symlink_metadata(path).map_err(LinkError::io("read metadata", path))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(LinkError::io("remove directory", path))
    } else {
        fs::remove_file(path).map_err(LinkError::io("remove file", path))
    }
}

/// Whether `path` is a real (non-symlink) directory with no entries.
#[must_use]
pub fn is_empty_dir(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_dir())
        && fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::RecordingLog;

    // -----------------------------------------------------------------------
    // ensure_dir / ensure_parent_dir
    // -----------------------------------------------------------------------

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested, false, &log).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        assert_eq!(log.action_kinds(), vec![ActionKind::MakeDir]);
    }

    #[test]
    fn ensure_parent_dir_noop_when_parent_exists() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        ensure_parent_dir(&dir.path().join("file.txt"), false, &log).unwrap();
        assert!(log.action_kinds().is_empty());
    }

    #[test]
    fn ensure_dir_dry_run_reports_without_creating() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let target = dir.path().join("x/y");
        ensure_dir(&target, true, &log).unwrap();
        assert!(!target.exists());
        assert_eq!(log.action_kinds(), vec![ActionKind::MakeDir]);
    }

    #[test]
    fn file_in_ancestor_position_is_structural() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        fs::write(dir.path().join(".config"), b"not a dir").unwrap();
        let err = ensure_parent_dir(&dir.path().join(".config/qtile"), false, &log).unwrap_err();
        match err {
            LinkError::Structural { path } => assert_eq!(path, dir.path().join(".config")),
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_ancestor_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        ensure_dir(&dir.path().join("alias/sub"), false, &log).unwrap();
        assert!(dir.path().join("real/sub").is_dir());
    }

    // -----------------------------------------------------------------------
    // symlinks
    // -----------------------------------------------------------------------

    #[cfg(unix)]
    #[test]
    fn create_and_remove_symlink_leaves_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        create_symlink(&target, &link).unwrap();
        assert!(link.symlink_metadata().unwrap().is_symlink());
        remove_symlink(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(target.is_dir());
    }

    // -----------------------------------------------------------------------
    // move_path / copy_tree
    // -----------------------------------------------------------------------

    #[test]
    fn move_path_renames_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), b"data").unwrap();
        move_path(&dir.path().join("a"), &dir.path().join("b")).unwrap();
        assert!(!dir.path().join("a").exists());
        assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"data");
    }

    #[test]
    fn move_path_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = move_path(&dir.path().join("nope"), &dir.path().join("b")).unwrap_err();
        assert!(matches!(err, LinkError::Io { action: "rename", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_preserves_nested_files_and_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/f.txt"), b"f").unwrap();
        std::os::unix::fs::symlink("sub/f.txt", src.join("alias")).unwrap();

        let dst = dir.path().join("dst");
        copy_tree(&src, &dst).unwrap();

        assert_eq!(fs::read(dst.join("sub/f.txt")).unwrap(), b"f");
        assert_eq!(
            fs::read_link(dst.join("alias")).unwrap(),
            Path::new("sub/f.txt")
        );
    }

    #[test]
    fn is_empty_dir_detects_contents() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        assert!(is_empty_dir(&empty));
        fs::write(empty.join("f"), b"").unwrap();
        assert!(!is_empty_dir(&empty));
        assert!(!is_empty_dir(&dir.path().join("missing")));
    }
}
