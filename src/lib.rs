/*!
 * cleancopy - Copy a source tree and strip comments from the copy
 *
 * This library copies a directory into an owned destination and removes
 * comments from the `.js` and `.ts` files of the copy, leaving the source
 * tree untouched.
 */

pub mod cleaner;
pub mod config;
pub mod copier;
pub mod error;
pub mod guard;
pub mod patterns;
pub mod report;
pub mod runner;
pub mod stripper;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use cleaner::Cleaner;
pub use config::{Args, RunConfig};
pub use copier::{copy_tree, CopyStats};
pub use error::{CleanCopyError, Result};
pub use guard::{GuardError, MARKER_FILE_NAME};
pub use patterns::ExclusionPattern;
pub use report::{ReportFormat, Reporter, RunReport, RunStats};
pub use runner::Runner;
pub use stripper::{CommentStripper, ScriptCommentStripper, StripError, StripOptions};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
