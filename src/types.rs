/*!
 * Core types shared by the copy and clean phases
 */

use std::fmt;

/// Suffix of plain script files
pub const SCRIPT_SUFFIX: &str = ".js";
/// Suffix of typed script files
pub const TYPED_SCRIPT_SUFFIX: &str = ".ts";
/// Suffix of minified script files
pub const MINIFIED_SUFFIX: &str = ".min.js";

/// Represents the kinds of entries met while copying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Sockets, FIFOs, devices
    Other,
}

impl EntryKind {
    /// Classify a walkdir file type (links are not followed)
    pub fn of(file_type: std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "special file",
        };
        f.write_str(name)
    }
}

/// Why a candidate file was left untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Minified script while `--no-minified` is active
    Minified,
    /// Matched the given exclusion pattern
    Pattern(String),
    /// Reading, stripping or writing failed
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minified => f.write_str("minified"),
            Self::Pattern(p) => write!(f, "excluded by '{}'", p),
            Self::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// What the cleaning walker decides for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Not a candidate: left alone and not counted
    Ignore,
    /// Candidate excluded from stripping
    Skip(SkipReason),
    /// Candidate to strip in place
    Strip,
}

/// Whether a file name carries one of the recognized script suffixes
pub fn is_candidate_name(name: &str) -> bool {
    name.ends_with(SCRIPT_SUFFIX) || name.ends_with(TYPED_SCRIPT_SUFFIX)
}

/// Whether a file name denotes a minified script
pub fn is_minified_name(name: &str) -> bool {
    name.ends_with(MINIFIED_SUFFIX)
}
