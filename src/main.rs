/*!
 * Command-line interface for cleancopy
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use cleancopy::config::{Args, RunConfig};
use cleancopy::report::{ReportFormat, Reporter};
use cleancopy::runner::{progress_style, Runner};
use cleancopy::stripper::ScriptCommentStripper;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // help and version requests are not failures
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "cleancopy", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cleancopy=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(args: Args) -> cleancopy::Result<()> {
    let config = RunConfig::from_args(args)?;

    // log lines and a live bar would interleave
    let progress = if config.verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(progress_style());
        bar
    };

    let stripper = ScriptCommentStripper;
    let report = Runner::new(&config, &stripper, progress).run()?;

    let format = if config.quiet {
        ReportFormat::Line
    } else {
        ReportFormat::ConsoleTable
    };
    Reporter::new(format).print_report(&report);

    Ok(())
}
