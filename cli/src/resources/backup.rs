//! Allocation of unused backup paths for displaced home entries.
//!
//! A backup lives next to the original as `<name>.bak.<YYYYmmdd-HHMMSS>`,
//! with `.1`, `.2`, ... appended when that name is already taken. Nothing
//! existing is ever overwritten; dangling symlinks count as taken.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::identity::exists_or_symlink;

/// `strftime` layout of the timestamp embedded in backup names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Return the first free backup path for `path` using `stamp`.
///
/// ```
/// use std::path::Path;
/// use dotlink::resources::backup::allocate_backup_path;
///
/// let dir = tempfile::tempdir().unwrap();
/// let backup = allocate_backup_path(&dir.path().join(".bashrc"), "20240101-000000");
/// assert_eq!(backup, dir.path().join(".bashrc.bak.20240101-000000"));
/// ```
#[must_use]
pub fn allocate_backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut base = OsString::from(path.as_os_str());
    base.push(format!(".bak.{stamp}"));
    let base = PathBuf::from(base);
    if !exists_or_symlink(&base) {
        return base;
    }

    let mut n: u32 = 1;
    loop {
        let mut candidate = OsString::from(base.as_os_str());
        candidate.push(format!(".{n}"));
        let candidate = PathBuf::from(candidate);
        if !exists_or_symlink(&candidate) {
            return candidate;
        }
        n = n.saturating_add(1);
    }
}
