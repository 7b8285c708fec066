//! Pseudo-encryption repair of a single archive on disk.
//!
//! [`repair`] reads the archive, clears every odd flag byte found by the
//! scanner, writes the untouched bytes to `<path>.bak` and finally replaces
//! the archive with the patched bytes. The archive itself is only written
//! after the backup exists, and that write goes through a temporary file and
//! a rename, so every failure leaves the original file as it was.
//!
//! Calls against distinct paths may run concurrently. Calls against the same
//! path race on both the backup and the target; callers must serialize them.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::io::{read_archive, replace_atomically, sibling_with_suffix, write_file};
use crate::zip::{self, HeaderKind, ScanReport};

/// Suffix appended to the archive path for the backup of the original bytes
pub const BACKUP_SUFFIX: &str = ".bak";

/// Errors that end a repair call
#[derive(Debug, Error)]
pub enum RepairError {
    /// The archive could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No header carries an odd flag byte. Not a failure: the archive is clean.
    #[error("no pseudo-encryption detected")]
    NoPseudoEncryptionDetected,

    /// Flags were cleared but the buffer still equals the original.
    #[error("patching produced no change")]
    NoChangeProduced,

    /// The backup could not be written; the archive was not touched.
    #[error("failed to write backup {}: {source}", path.display())]
    BackupWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The patched archive could not be written.
    #[error("failed to write patched archive {}: {source}", path.display())]
    PatchWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking task running the repair did not complete.
    #[error("repair task failed: {0}")]
    Worker(String),
}

impl RepairError {
    /// True for outcomes a caller should present as information, not failure
    pub fn is_informational(&self) -> bool {
        matches!(self, RepairError::NoPseudoEncryptionDetected)
    }
}

/// Result type for repair operations.
pub type Result<T> = std::result::Result<T, RepairError>;

/// Progress notifications delivered by [`repair_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairEvent {
    /// The archive was read into memory
    Loaded { len: usize },
    /// A header's flag byte was cleared
    Patched { kind: HeaderKind, offset: usize },
    /// The original bytes are safe at `path`
    BackupWritten { path: PathBuf },
    /// The archive at `path` now holds the patched bytes
    Replaced { path: PathBuf },
}

/// Summary of a successful repair
#[derive(Debug, Clone)]
pub struct RepairReport {
    pub path: PathBuf,
    pub backup_path: PathBuf,
    pub scan: ScanReport,
}

impl RepairReport {
    pub fn patched_count(&self) -> usize {
        self.scan.flagged_count()
    }

    /// Status line for display
    pub fn status_message(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string());

        format!(
            "repaired {}: {} header(s) patched, backup at {}; try extracting it again",
            name,
            self.patched_count(),
            self.backup_path.display()
        )
    }
}

/// Scan the archive at `path` without modifying anything
pub fn inspect(path: &Path) -> Result<ScanReport> {
    let data = read_archive(path).map_err(|source| RepairError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(zip::scan(&data))
}

/// Repair the archive at `path` in place, keeping a `.bak` copy of the original
pub fn repair(path: &Path) -> Result<RepairReport> {
    repair_with(path, |_| {})
}

/// Like [`repair`], reporting progress to `on_event`
pub fn repair_with<F>(path: &Path, mut on_event: F) -> Result<RepairReport>
where
    F: FnMut(RepairEvent),
{
    let mut data = read_archive(path).map_err(|source| RepairError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    on_event(RepairEvent::Loaded { len: data.len() });

    let original = data.clone();

    let scan = zip::patch(&mut data);
    if !scan.is_modified() {
        info!(path = %path.display(), headers = scan.records.len(), "no pseudo-encryption detected");
        return Err(RepairError::NoPseudoEncryptionDetected);
    }

    if data == original {
        warn!(path = %path.display(), "flags reported as cleared but buffer is unchanged");
        return Err(RepairError::NoChangeProduced);
    }

    for record in scan.flagged() {
        debug!(
            kind = record.kind.short_name(),
            offset = record.offset,
            flags = ?record.flags,
            "cleared encryption flag"
        );
        on_event(RepairEvent::Patched {
            kind: record.kind,
            offset: record.offset,
        });
    }

    let backup_path = sibling_with_suffix(path, BACKUP_SUFFIX);
    write_file(&backup_path, &original).map_err(|source| {
        warn!(path = %backup_path.display(), error = %source, "backup write failed");
        RepairError::BackupWrite {
            path: backup_path.clone(),
            source,
        }
    })?;
    on_event(RepairEvent::BackupWritten {
        path: backup_path.clone(),
    });

    replace_atomically(path, &data).map_err(|source| {
        warn!(path = %path.display(), error = %source, "patched write failed");
        RepairError::PatchWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    on_event(RepairEvent::Replaced {
        path: path.to_path_buf(),
    });

    info!(
        path = %path.display(),
        local = scan.flagged().filter(|r| r.kind == HeaderKind::LocalFile).count(),
        central = scan.flagged().filter(|r| r.kind == HeaderKind::CentralDirectory).count(),
        "archive repaired"
    );

    Ok(RepairReport {
        path: path.to_path_buf(),
        backup_path,
        scan,
    })
}

/// Run [`repair`] on tokio's blocking pool
pub async fn repair_async(path: PathBuf) -> Result<RepairReport> {
    tokio::task::spawn_blocking(move || repair(&path))
        .await
        .map_err(|e| RepairError::Worker(e.to_string()))?
}
