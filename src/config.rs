/*!
 * Configuration handling for cleancopy
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::{IoResultExt, Result};
use crate::patterns::{compile_all, ExclusionPattern};

/// Command-line arguments for cleancopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "cleancopy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy a source tree and strip comments from the scripts in the copy",
    long_about = "Copies a directory tree into a destination and removes comments from every .js and .ts file in the copy. The source tree is never modified. An existing destination is only replaced when it was created by cleancopy."
)]
pub struct Args {
    /// Source directory to copy
    #[clap(short, long, value_name = "PATH", required_unless_present = "generate")]
    pub source: Option<PathBuf>,

    /// Destination directory for the cleaned copy
    #[clap(
        short,
        long,
        value_name = "PATH",
        required_unless_present = "generate"
    )]
    pub destination: Option<PathBuf>,

    /// Exclude matching files from stripping ("dir/" prefix or "*"/"?" glob); repeatable.
    /// Values are split on ',', so a single pattern cannot contain a comma
    #[clap(long, value_name = "PATTERN", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Leave minified scripts (*.min.js) untouched
    #[clap(long)]
    pub no_minified: bool,

    /// Log every decision
    #[clap(short, long)]
    pub verbose: bool,

    /// Print a single summary line instead of tables
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Run configuration, built once at startup and read-only afterwards
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Absolute, canonical source root
    pub source_root: PathBuf,

    /// Absolute destination root
    pub dest_root: PathBuf,

    /// Compiled exclusion patterns
    pub patterns: Vec<ExclusionPattern>,

    /// Skip minified scripts
    pub exclude_minified: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Single-line summary
    pub quiet: bool,
}

impl RunConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let Some(source) = args.source else {
            crate::bail!(Config, "--source is required");
        };
        let Some(destination) = args.destination else {
            crate::bail!(Config, "--destination is required");
        };

        Self::new(&source, &destination, &args.exclude)
            .map(|config| config.with_flags(args.no_minified, args.verbose, args.quiet))
    }

    /// Resolve paths and compile patterns
    pub fn new<S: AsRef<str>>(source: &Path, destination: &Path, patterns: &[S]) -> Result<Self> {
        crate::ensure!(
            !source.as_os_str().is_empty(),
            Config,
            "source path is empty"
        );
        crate::ensure!(
            !destination.as_os_str().is_empty(),
            Config,
            "destination path is empty"
        );
        crate::ensure!(
            source.is_dir(),
            Config,
            "source directory not found: {}",
            source.display()
        );

        let source_root = fs::canonicalize(source).at_path(source)?;
        let dest_root = resolve_destination(destination)?;

        Ok(Self {
            source_root,
            dest_root,
            patterns: compile_all(patterns),
            exclude_minified: false,
            verbose: false,
            quiet: false,
        })
    }

    /// Set the boolean switches
    pub fn with_flags(mut self, exclude_minified: bool, verbose: bool, quiet: bool) -> Self {
        self.exclude_minified = exclude_minified;
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    /// Validate the configuration before anything touches the filesystem
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.source_root.is_dir(),
            Config,
            "source directory not found: {}",
            self.source_root.display()
        );
        crate::ensure!(
            self.dest_root != self.source_root,
            Config,
            "source and destination are the same directory: {}",
            self.source_root.display()
        );
        crate::ensure!(
            !self.dest_root.starts_with(&self.source_root),
            Config,
            "destination {} is inside the source {}",
            self.dest_root.display(),
            self.source_root.display()
        );
        crate::ensure!(
            !self.source_root.starts_with(&self.dest_root),
            Config,
            "source {} is inside the destination {}",
            self.source_root.display(),
            self.dest_root.display()
        );
        Ok(())
    }
}

/// Absolute destination path: canonical when it exists, otherwise the
/// canonical nearest existing ancestor followed by the lexically normalized
/// missing components (`..` pops, `.` is dropped).
fn resolve_destination(destination: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(destination).at_path(destination)?;
    if let Ok(canonical) = fs::canonicalize(&absolute) {
        return Ok(canonical);
    }

    let mut existing = absolute.as_path();
    let mut resolved = loop {
        match existing.parent() {
            Some(parent) => {
                existing = parent;
                if let Ok(canonical) = fs::canonicalize(existing) {
                    break canonical;
                }
            }
            None => break PathBuf::new(),
        }
    };

    let tail = absolute.strip_prefix(existing).unwrap_or(&absolute);
    for component in tail.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}
