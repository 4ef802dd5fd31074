//! Stale-aware single-slot backups.
//!
//! Each managed file gets one sibling backup, `<file>.bak`, refreshed only
//! when the live file is strictly newer than the backup. The backup is a
//! best-effort safety net holding the single most recent prior state, not a
//! versioned history.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Refresh `<target>.bak` from `target` if the live file is newer.
///
/// A missing backup has the effective modification time of the epoch, so the
/// first call always produces one. The backup is replaced atomically (copy to
/// a temp sibling, then rename): an interrupted process never leaves a
/// half-written backup in place. No-op when `target` is not a regular file or
/// the backup is already current. Returns whether a backup was written.
pub fn backup(target: &Path) -> Result<bool> {
    if !target.is_file() {
        return Ok(false);
    }

    let backup_path = backup_path_for(target);
    if mod_time(target) <= mod_time(&backup_path) {
        return Ok(false);
    }

    let tmp = crate::document::tmp_sibling(&backup_path);
    fs::copy(target, &tmp).map_err(|e| Error::io("copy", target, e))?;
    fs::rename(&tmp, &backup_path).map_err(|e| Error::io("replace", &backup_path, e))?;
    debug!(file = %target.display(), "refreshed backup");
    Ok(true)
}

/// Sibling backup path: the file name with `.bak` appended.
pub fn backup_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    target.with_file_name(name)
}

/// Modification time, or the epoch for files that do not exist (or whose
/// metadata cannot be read).
fn mod_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
