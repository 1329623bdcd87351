/*!
 * Run statistics and the console summary
 *
 * Renders the end-of-run summary with the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::copier::CopyStats;
use crate::types::SkipReason;
use crate::utils::format_file_size;

/// Maximum number of skipped files listed in the report
const MAX_LISTED_SKIPS: usize = 15;

/// A candidate that was left untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path relative to the destination, forward slashes
    pub path: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Counters for the cleaning phase
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Candidates stripped in place
    pub processed: usize,
    /// Candidates left untouched, failures included
    pub skipped: usize,
    /// The subset of `skipped` caused by read, strip or write errors
    pub failed: usize,
    /// Every skipped candidate in visiting order
    pub skipped_files: Vec<SkippedFile>,
}

impl RunStats {
    /// Record a successfully stripped candidate
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Record a skipped candidate
    pub fn record_skipped(&mut self, path: String, reason: SkipReason) {
        self.skipped += 1;
        if matches!(reason, SkipReason::Failed(_)) {
            self.failed += 1;
        }
        self.skipped_files.push(SkippedFile { path, reason });
    }
}

/// Everything shown at the end of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Source root
    pub source: String,
    /// Destination root
    pub destination: String,
    /// Time taken by all phases
    pub duration: Duration,
    /// Copy phase counters
    pub copy: CopyStats,
    /// Clean phase counters
    pub stats: RunStats,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    /// A single summary line
    Line,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
            ReportFormat::Line => self.generate_line(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("{}", self.generate_report(report));
    }

    fn generate_line(&self, report: &RunReport) -> String {
        format!(
            "Processed {} file(s), skipped {} file(s)",
            report.stats.processed, report.stats.skipped
        )
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "Source",
                value: report.source.clone(),
            },
            SummaryRow {
                key: "Destination",
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "Files Copied",
                value: format!(
                    "{} ({})",
                    report.copy.files,
                    format_file_size(report.copy.bytes)
                ),
            },
            SummaryRow {
                key: "Directories Created",
                value: report.copy.directories.to_string(),
            },
        ];

        if report.copy.special_skipped > 0 {
            rows.push(SummaryRow {
                key: "Links/Special Skipped",
                value: report.copy.special_skipped.to_string(),
            });
        }

        rows.push(SummaryRow {
            key: "Comments Stripped",
            value: format!("{} file(s)", report.stats.processed),
        });
        rows.push(SummaryRow {
            key: "Skipped",
            value: format!("{} file(s)", report.stats.skipped),
        });
        if report.stats.failed > 0 {
            rows.push(SummaryRow {
                key: "Failed",
                value: format!("{} file(s)", report.stats.failed),
            });
        }
        rows.push(SummaryRow {
            key: "Elapsed",
            value: format!("{:.4?}", report.duration),
        });

        style(Table::new(rows))
    }

    fn create_skipped_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SkipRow<'a> {
            #[tabled(rename = "File Path")]
            path: &'a str,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkipRow> = report
            .stats
            .skipped_files
            .iter()
            .take(MAX_LISTED_SKIPS)
            .map(|s| SkipRow {
                path: &s.path,
                reason: s.reason.to_string(),
            })
            .collect();

        style(Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let summary = self.create_summary_table(report);
        if report.stats.skipped_files.is_empty() {
            return format!("CLEAN COPY COMPLETE\n{}", summary);
        }

        let skipped_title = if report.stats.skipped_files.len() > MAX_LISTED_SKIPS {
            format!("SKIPPED FILES (first {})", MAX_LISTED_SKIPS)
        } else {
            "SKIPPED FILES".to_string()
        };

        format!(
            "{}\n{}\n\nCLEAN COPY COMPLETE\n{}",
            skipped_title,
            self.create_skipped_table(report),
            summary
        )
    }
}

fn style(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}
