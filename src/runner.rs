/*!
 * Run orchestration: guard, copy, clean
 */

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::cleaner::Cleaner;
use crate::config::RunConfig;
use crate::copier::{copy_tree, CopyStats};
use crate::error::Result;
use crate::guard;
use crate::report::{RunReport, RunStats};
use crate::stripper::CommentStripper;
use crate::utils::count_files;

/// Sequences the three phases of a run
pub struct Runner<'a> {
    config: &'a RunConfig,
    stripper: &'a dyn CommentStripper,
    progress: ProgressBar,
}

impl<'a> Runner<'a> {
    /// Create a runner reporting progress on `progress`
    pub fn new(
        config: &'a RunConfig,
        stripper: &'a dyn CommentStripper,
        progress: ProgressBar,
    ) -> Self {
        Self {
            config,
            stripper,
            progress,
        }
    }

    /// Runner without any progress display
    pub fn headless(config: &'a RunConfig, stripper: &'a dyn CommentStripper) -> Self {
        Self::new(config, stripper, ProgressBar::hidden())
    }

    /// Execute the run.
    ///
    /// Guard and copy failures abort with an error; the destination may then
    /// be partially populated. Per-file clean failures only show up in the
    /// returned statistics.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let config = self.config;

        config.validate()?;
        let note = format!("source: {}", config.source_root.display());
        guard::prepare(&config.dest_root, &note)?;

        let total = count_files(&config.source_root).unwrap_or(0);
        self.phase("Copying", total);
        let copy = copy_tree(&config.source_root, &config.dest_root, &self.progress)?;

        self.phase("Cleaning", copy.files as u64);
        let mut stats = RunStats::default();
        Cleaner::new(config, self.stripper, &self.progress).clean(&config.dest_root, &mut stats);
        self.progress.finish_and_clear();

        tracing::info!(
            processed = stats.processed,
            skipped = stats.skipped,
            "clean complete"
        );

        Ok(self.report(copy, stats, start.elapsed()))
    }

    fn phase(&self, name: &'static str, length: u64) {
        self.progress.set_position(0);
        self.progress.set_length(length);
        self.progress.set_prefix(name);
    }

    fn report(&self, copy: CopyStats, stats: RunStats, duration: Duration) -> RunReport {
        RunReport {
            source: self.config.source_root.display().to_string(),
            destination: self.config.dest_root.display().to_string(),
            duration,
            copy,
            stats,
        }
    }
}

/// Progress bar style used by the binary
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {bar:30.cyan/blue} {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
