//! Append-only JSON-lines file with size-based rotation.
//!
//! Before each write the current file size is checked against
//! [`Rotation::max_bytes`]. A file over the limit is renamed to
//! `<name>.json.<unix-nanos>` and a fresh file is started. Only the newest
//! [`Rotation::max_backups`] backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rotation limits of a [`FileWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub max_bytes: u64,
    pub max_backups: usize,
}

impl Default for Rotation {
    /// 10 MB per file, 3 backups.
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_backups: 3,
        }
    }
}

/// Thread-safe rotating writer. The file is opened lazily on the first write.
pub struct FileWriter {
    file_path: PathBuf,
    rotation: Rotation,
    handle: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf, rotation: Rotation) -> Self {
        Self {
            file_path,
            rotation,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Fails on a poisoned lock or on any I/O error while rotating, opening,
    /// writing or flushing.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        let over_limit = fs::metadata(&self.file_path)
            .map(|m| m.len() > self.rotation.max_bytes)
            .unwrap_or(false);
        if over_limit {
            *handle = None;
            self.rotate()?;
        }

        if handle.is_none() {
            *handle = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }
        let file = handle
            .as_mut()
            .ok_or_else(|| io::Error::other("trace file not open"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn rotate(&self) -> io::Result<()> {
        let mut stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let mut backup = self.backup_path(stamp);
        while backup.exists() {
            stamp += 1;
            backup = self.backup_path(stamp);
        }

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup)?;
        }
        self.prune_backups()
    }

    fn backup_path(&self, stamp: u128) -> PathBuf {
        self.file_path.with_extension(format!("json.{stamp}"))
    }

    /// Backups of this file, newest first.
    fn backups(&self) -> io::Result<Vec<(u128, PathBuf)>> {
        let dir = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        let prefix = self
            .file_path
            .with_extension("json.")
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| io::Error::other("trace file has no usable name"))?;

        let mut backups: Vec<(u128, PathBuf)> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stamp = name.strip_prefix(&prefix)?.parse::<u128>().ok()?;
                Some((stamp, entry.path()))
            })
            .collect();
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups)
    }

    fn prune_backups(&self) -> io::Result<()> {
        for (_, old) in self.backups()?.into_iter().skip(self.rotation.max_backups) {
            // A backup that cannot be removed is retried on the next rotation.
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}
