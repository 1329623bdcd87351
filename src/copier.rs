/*!
 * Recursive tree copy
 *
 * Mirrors a source directory into an already prepared destination. Any
 * failure on a directory or regular file aborts the whole copy; symbolic
 * links and special files are skipped with a warning, as is a top-level
 * entry named like the marker file.
 */

use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::error::{CleanCopyError, IoResultExt, Result};
use crate::guard::MARKER_FILE_NAME;
use crate::types::EntryKind;
use crate::utils::relative_to;

/// Counters gathered while copying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Directories created under the destination
    pub directories: usize,
    /// Regular files copied
    pub files: usize,
    /// Bytes copied
    pub bytes: u64,
    /// Symlinks, special files and marker look-alikes left out
    pub special_skipped: usize,
}

/// Copy every directory and regular file under `src` into `dest`.
///
/// `dest` must already exist. Traversal is depth-first and unordered.
pub fn copy_tree(src: &Path, dest: &Path, progress: &ProgressBar) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    let mut walker = WalkDir::new(src).min_depth(1).follow_links(false).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        if entry.depth() == 1 && entry.file_name() == MARKER_FILE_NAME {
            tracing::warn!(
                "skipping {}: the name is reserved for the destination marker",
                entry.path().display()
            );
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            stats.special_skipped += 1;
            continue;
        }
        let target = dest.join(relative_to(src, entry.path())?);

        match EntryKind::of(entry.file_type()) {
            EntryKind::Directory => {
                fs::create_dir_all(&target).at_path(&target)?;
                stats.directories += 1;
            }
            EntryKind::File => {
                let bytes = fs::copy(entry.path(), &target).map_err(|source| {
                    CleanCopyError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    }
                })?;
                stats.files += 1;
                stats.bytes += bytes;
                progress.inc(1);
            }
            kind @ (EntryKind::Symlink | EntryKind::Other) => {
                tracing::warn!("skipping {} {}", kind, entry.path().display());
                stats.special_skipped += 1;
            }
        }
    }

    tracing::info!(
        files = stats.files,
        directories = stats.directories,
        bytes = stats.bytes,
        "copy complete"
    );
    Ok(stats)
}
