//! Deciding whether a home path already refers to a repository entry.
//!
//! A target is satisfied when it is a symlink whose fully resolved path is
//! the resolved source, or when it names the same file system object as the
//! source through any other route (a symlinked ancestor, a hard link). Broken
//! links never match.
use std::path::{Path, PathBuf};

/// Resolve `path` to an absolute path with every symlink followed.
///
/// Returns `None` if any component does not exist (including dangling
/// links).
#[must_use]
pub fn resolve(path: &Path) -> Option<PathBuf> {
    dunce::canonicalize(path).ok()
}

/// Whether `path` itself is a symlink (dangling or not).
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_symlink())
}

/// Whether anything occupies `path`, counting dangling symlinks.
#[must_use]
pub fn exists_or_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether `target` is a symlink that resolves to the same place as `source`.
#[must_use]
pub fn is_same_symlink(target: &Path, source: &Path) -> bool {
    if !is_symlink(target) {
        return false;
    }
    matches!((resolve(target), resolve(source)), (Some(t), Some(s)) if t == s)
}

/// Whether `a` and `b` both exist and are the same file system object.
///
/// Compares canonical paths first, then falls back to device and inode
/// numbers so hard links are recognised on Unix.
#[must_use]
pub fn refers_to_same_file(a: &Path, b: &Path) -> bool {
    let (Some(ra), Some(rb)) = (resolve(a), resolve(b)) else {
        return false;
    };
    if ra == rb {
        return true;
    }
    same_inode(&ra, &rb)
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (a.metadata(), b.metadata()) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
const fn same_inode(_a: &Path, _b: &Path) -> bool {
    false
}

/// Whether `target` already satisfies a link to `source`.
///
/// ```no_run
/// use std::path::Path;
/// use dotlink::resources::identity::is_same_target;
///
/// if is_same_target(Path::new("/home/u/.bashrc"), Path::new("/repo/bashrc")) {
///     println!("already linked");
/// }
/// ```
#[must_use]
pub fn is_same_target(target: &Path, source: &Path) -> bool {
    is_same_symlink(target, source) || refers_to_same_file(target, source)
}
