/*!
 * Cleaning walker
 *
 * Visits the copied tree, decides for every regular file whether it is a
 * candidate, and strips comments from the candidates that are not excluded.
 * Failures on individual files are reported and counted, never fatal.
 */

use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::{IoResultExt, Result};
use crate::guard::MARKER_FILE_NAME;
use crate::patterns;
use crate::report::RunStats;
use crate::stripper::{CommentStripper, StripOptions};
use crate::types::{is_candidate_name, is_minified_name, Disposition, SkipReason};
use crate::utils::{relative_to, to_slash_path};

/// Options used for every stripped file
const STRIP_OPTIONS: StripOptions = StripOptions {
    preserve_blank_lines: false,
};

/// Walker applying exclusion rules and the comment stripper
pub struct Cleaner<'a> {
    config: &'a RunConfig,
    stripper: &'a dyn CommentStripper,
    progress: &'a ProgressBar,
}

impl<'a> Cleaner<'a> {
    /// Create a new cleaner
    pub fn new(
        config: &'a RunConfig,
        stripper: &'a dyn CommentStripper,
        progress: &'a ProgressBar,
    ) -> Self {
        Self {
            config,
            stripper,
            progress,
        }
    }

    /// Decide what happens to the file at `relative_path` (forward slashes)
    pub fn classify(&self, relative_path: &str) -> Disposition {
        if relative_path == MARKER_FILE_NAME {
            return Disposition::Ignore;
        }

        let name = relative_path
            .rsplit_once('/')
            .map_or(relative_path, |(_, name)| name);
        if !is_candidate_name(name) {
            return Disposition::Ignore;
        }

        if self.config.exclude_minified && is_minified_name(name) {
            return Disposition::Skip(SkipReason::Minified);
        }

        if let Some(pattern) = patterns::first_match(relative_path, &self.config.patterns) {
            return Disposition::Skip(SkipReason::Pattern(pattern.to_string()));
        }

        Disposition::Strip
    }

    /// Walk `dest_root` and clean every eligible candidate
    pub fn clean(&self, dest_root: &Path, stats: &mut RunStats) {
        for entry in WalkDir::new(dest_root).min_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("cannot read {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = match relative_to(dest_root, entry.path()) {
                Ok(rel) => to_slash_path(rel),
                Err(e) => {
                    tracing::warn!("{}", e);
                    continue;
                }
            };

            match self.classify(&rel) {
                Disposition::Ignore => {}
                Disposition::Skip(reason) => {
                    tracing::debug!(path = %rel, %reason, "skipped");
                    stats.record_skipped(rel, reason);
                }
                Disposition::Strip => match self.strip_file(entry.path()) {
                    Ok(()) => {
                        tracing::debug!(path = %rel, "stripped");
                        stats.record_processed();
                    }
                    Err(e) => {
                        tracing::warn!("failed to clean {}: {}", entry.path().display(), e);
                        stats.record_skipped(rel, SkipReason::Failed(e.to_string()));
                    }
                },
            }
            self.progress.inc(1);
        }
    }

    /// Read, strip and overwrite one file
    fn strip_file(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).at_path(path)?;
        let stripped = self.stripper.strip(&text, STRIP_OPTIONS)?;
        fs::write(path, stripped).at_path(path)
    }
}
