/*!
 * End-to-end tests for cleancopy runs
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::error::CleanCopyError;
use crate::guard::{GuardError, MARKER_FILE_NAME};
use crate::report::RunReport;
use crate::runner::Runner;
use crate::stripper::ScriptCommentStripper;

// Helper function to create the source tree used by most tests
fn setup_source() -> io::Result<TempDir> {
    let temp_dir = tempdir()?;
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("lib"))?;

    fs::write(src.join("a.js"), "// c\nlet x=1;")?;
    fs::write(src.join("b.min.js"), "/*! v1 */var a=1;// tail")?;
    fs::write(src.join("lib").join("c.ts"), "// typed\nconst c: number = 3;\n")?;

    let mut readme = File::create(src.join("README.md"))?;
    writeln!(readme, "# Project // not a comment")?;

    Ok(temp_dir)
}

fn run(src: &Path, dest: &Path, patterns: &[&str], no_minified: bool) -> crate::Result<RunReport> {
    let config = RunConfig::new(src, dest, patterns)?.with_flags(no_minified, false, false);
    Runner::headless(&config, &ScriptCommentStripper).run()
}

/// Relative path -> contents (None for directories), marker excluded
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_name() != MARKER_FILE_NAME)
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let contents = e
                .file_type()
                .is_file()
                .then(|| fs::read(e.path()).unwrap());
            (rel, contents)
        })
        .collect()
}

#[test]
fn test_scenario_minified_and_prefix_exclusion() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");

    let report = run(&src, &dest, &["lib/"], true).unwrap();

    assert_eq!(fs::read_to_string(dest.join("a.js"))?, "let x=1;");
    assert_eq!(fs::read(dest.join("b.min.js"))?, fs::read(src.join("b.min.js"))?);
    assert_eq!(
        fs::read(dest.join("lib").join("c.ts"))?,
        fs::read(src.join("lib").join("c.ts"))?
    );
    assert_eq!(report.stats.processed, 1);
    assert_eq!(report.stats.skipped, 2);
    assert_eq!(report.stats.failed, 0);
    Ok(())
}

#[test]
fn test_without_exclusions_everything_is_stripped() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");

    let report = run(&src, &dest, &[], false).unwrap();

    assert_eq!(report.stats.processed, 3);
    assert_eq!(report.stats.skipped, 0);
    assert_eq!(fs::read_to_string(dest.join("b.min.js"))?, "var a=1;");
    assert_eq!(
        fs::read_to_string(dest.join("lib").join("c.ts"))?,
        "const c: number = 3;\n"
    );
    // non-script files are copied verbatim
    assert_eq!(fs::read(dest.join("README.md"))?, fs::read(src.join("README.md"))?);
    Ok(())
}

#[test]
fn test_glob_exclusion() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");

    let report = run(&src, &dest, &["*.ts"], false).unwrap();

    assert_eq!(report.stats.processed, 2);
    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.skipped_files[0].path, "lib/c.ts");
    Ok(())
}

#[test]
fn test_source_is_never_modified() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let before = snapshot(&src);

    run(&src, &temp.path().join("out"), &[], false).unwrap();

    assert_eq!(before, snapshot(&src));
    assert!(!src.join(MARKER_FILE_NAME).exists());
    Ok(())
}

#[test]
fn test_foreign_destination_is_left_alone() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("unrelated");
    fs::create_dir_all(dest.join("docs"))?;
    fs::write(dest.join("docs").join("thesis.txt"), "years of work")?;
    fs::write(dest.join("a.js"), "// mine\n")?;
    let before = snapshot(&dest);

    let err = run(&src, &dest, &[], false).unwrap_err();

    assert!(matches!(
        err,
        CleanCopyError::Guard(GuardError::ForeignDirectory(_))
    ));
    assert_eq!(before, snapshot(&dest));
    assert!(!dest.join(MARKER_FILE_NAME).exists());
    Ok(())
}

#[test]
fn test_stale_files_from_previous_run_are_removed() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");

    run(&src, &dest, &[], false).unwrap();
    fs::write(dest.join("stale.js"), "// old")?;
    fs::create_dir(dest.join("old-dir"))?;
    fs::remove_file(src.join("b.min.js"))?;

    run(&src, &dest, &[], false).unwrap();

    let copied: Vec<PathBuf> = snapshot(&dest).into_keys().collect();
    let expected: Vec<PathBuf> = snapshot(&src).into_keys().collect();
    assert_eq!(copied, expected);
    assert!(dest.join(MARKER_FILE_NAME).is_file());
    Ok(())
}

#[test]
fn test_runs_are_idempotent() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");

    run(&src, &dest, &["lib/"], true).unwrap();
    let first = snapshot(&dest);
    run(&src, &dest, &["lib/"], true).unwrap();

    assert_eq!(first, snapshot(&dest));
    Ok(())
}

#[test]
fn test_unterminated_comment_is_reported_not_fatal() -> io::Result<()> {
    let temp = setup_source()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    fs::write(src.join("broken.js"), "let a; /* never closed\n")?;

    let report = run(&src, &dest, &[], false).unwrap();

    assert_eq!(report.stats.processed, 3);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(
        fs::read_to_string(dest.join("broken.js"))?,
        "let a; /* never closed\n"
    );
    Ok(())
}

#[test]
fn test_empty_source_produces_marker_only() -> io::Result<()> {
    let temp = tempdir()?;
    let src = temp.path().join("empty");
    fs::create_dir(&src)?;
    let dest = temp.path().join("out");

    let report = run(&src, &dest, &[], false).unwrap();

    assert_eq!(report.copy.files, 0);
    assert_eq!(report.stats.processed, 0);
    assert!(snapshot(&dest).is_empty());
    assert!(dest.join(MARKER_FILE_NAME).is_file());
    Ok(())
}
