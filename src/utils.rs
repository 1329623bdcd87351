/*!
 * Utility functions for cleancopy
 */

use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{CleanCopyError, Result};

/// Path of `path` below `root`
pub fn relative_to<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root).map_err(|_| {
        crate::error!(
            Config,
            "{} is not inside {}",
            path.display(),
            root.display()
        )
    })
}

/// Render a relative path with forward slashes, whatever the platform
pub fn to_slash_path(rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Count regular files under `dir` for progress tracking
pub fn count_files(dir: &Path) -> Result<u64> {
    let mut count = 0;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(CleanCopyError::from)?;
        if entry.file_type().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_slash_path() {
        let rel: PathBuf = ["lib", "deep", "a.js"].iter().collect();
        assert_eq!(to_slash_path(&rel), "lib/deep/a.js");
        assert_eq!(to_slash_path(Path::new("a.js")), "a.js");
        assert_eq!(to_slash_path(Path::new("")), "");
    }

    #[test]
    fn test_relative_to() {
        let root = Path::new("/tmp/out");
        assert_eq!(
            relative_to(root, Path::new("/tmp/out/lib/a.js")).unwrap(),
            Path::new("lib/a.js")
        );
        assert!(relative_to(root, Path::new("/elsewhere/a.js")).is_err());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(12), "12 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
