//! Global error handling for cleancopy
//!
//! This module provides a centralized error type that can represent errors
//! from all phases of a run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::guard::GuardError;
use crate::stripper::StripError;

/// Global error type for cleancopy operations
#[derive(Error, Debug)]
pub enum CleanCopyError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Destination guard refused or failed to prepare the destination
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// File system error tied to a specific path
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Comment stripping errors
    #[error("Strip error: {0}")]
    Strip(#[from] StripError),
}

/// Specialized Result type for cleancopy operations
pub type Result<T> = std::result::Result<T, CleanCopyError>;

/// Creates a CleanCopyError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CleanCopyError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching the offending path to IO errors
pub trait IoResultExt<T> {
    /// Wrap the error together with `path`
    fn at_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| CleanCopyError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
