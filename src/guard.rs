/*!
 * Destination guard
 *
 * A destination directory is only ever wiped when it carries the marker file
 * written by a previous run. The ownership check always completes before any
 * deletion.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Name of the sentinel file proving a destination belongs to cleancopy
pub const MARKER_FILE_NAME: &str = ".cleancopy-marker";

/// Errors raised while preparing the destination
#[derive(Error, Debug)]
pub enum GuardError {
    /// The destination exists but was not created by this tool
    #[error(
        "Destination {} exists and was not created by cleancopy (no .cleancopy-marker found); refusing to overwrite it",
        .0.display()
    )]
    ForeignDirectory(PathBuf),

    /// The destination exists but is not a directory
    #[error("Destination {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Failure while creating, deleting or writing
    #[error("Failed to prepare destination {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> GuardError + '_ {
    move |source| GuardError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Path of the marker file inside `dest_root`
pub fn marker_path(dest_root: &Path) -> PathBuf {
    dest_root.join(MARKER_FILE_NAME)
}

/// Whether `dest_root` carries a marker file
pub fn is_owned(dest_root: &Path) -> bool {
    // symlink_metadata so a dangling or planted link never counts as proof
    fs::symlink_metadata(marker_path(dest_root))
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Prepare `dest_root` for a fresh copy.
///
/// On success the destination is an empty directory holding exactly one
/// marker file. `marker_note` is appended to the marker's contents.
pub fn prepare(dest_root: &Path, marker_note: &str) -> GuardResult<()> {
    match fs::symlink_metadata(dest_root) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dest = %dest_root.display(), "creating destination");
        }
        Err(e) => return Err(io_err(dest_root)(e)),
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(GuardError::NotADirectory(dest_root.to_path_buf()));
            }
            if !is_owned(dest_root) {
                return Err(GuardError::ForeignDirectory(dest_root.to_path_buf()));
            }
            tracing::info!(dest = %dest_root.display(), "replacing previous output");
            fs::remove_dir_all(dest_root).map_err(io_err(dest_root))?;
        }
    }

    fs::create_dir_all(dest_root).map_err(io_err(dest_root))?;
    write_marker(dest_root, marker_note)
}

fn write_marker(dest_root: &Path, note: &str) -> GuardResult<()> {
    let path = marker_path(dest_root);
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    let contents = format!(
        "This directory was generated by cleancopy {} and may be deleted and recreated by it.\n\
         created: {}\n\
         host: {}\n\
         {}\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().to_rfc3339(),
        host,
        note,
    );

    fs::write(&path, contents).map_err(io_err(&path))
}
