use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Read the whole archive into memory
pub fn read_archive(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Sibling path of `path` with `suffix` appended to the full file name
///
/// `archive.zip` with `.bak` becomes `archive.zip.bak`.
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Directory a temporary sibling of `path` should be created in
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `data` to a temporary file next to `path`, then rename it into place.
///
/// `path` is either fully written or left as it was; a failed write removes
/// the temporary file.
fn persist_new(path: &Path, data: &[u8], permissions: Option<fs::Permissions>) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(data)?;
    tmp.flush()?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Write `data` to `path`, creating it or replacing an existing file whole
pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    persist_new(path, data, None)
}

/// Replace the file `path` refers to with `data`.
///
/// Symlinks are followed, so the archive a link points to is the one that
/// gets replaced. The bytes go to a temporary file in the target's directory,
/// which is flushed, synced, given the target's permissions and then renamed
/// over the target. On any error `path` is left as it was.
pub fn replace_atomically(path: &Path, data: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();

    persist_new(&target, data, Some(permissions))
}
