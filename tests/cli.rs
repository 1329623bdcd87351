/*!
 * Integration tests driving the cleancopy binary
 */

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cleancopy() -> Command {
    Command::cargo_bin("cleancopy").unwrap()
}

#[test]
fn test_help_exits_zero() {
    cleancopy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-minified"));
}

#[test]
fn test_help_documents_comma_splitting() {
    cleancopy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cannot contain a comma"));
}

#[test]
fn test_version_exits_zero() {
    cleancopy().arg("--version").assert().success();
}

#[test]
fn test_missing_arguments_exit_one() {
    cleancopy().assert().code(1);
    cleancopy().args(["-s", "somewhere"]).assert().code(1);
}

#[test]
fn test_missing_source_exits_one() {
    let temp = tempdir().unwrap();
    cleancopy()
        .arg("-s")
        .arg(temp.path().join("nope"))
        .arg("-d")
        .arg(temp.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source directory not found"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_full_run_with_exclusions() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    fs::create_dir_all(src.join("lib")).unwrap();
    fs::write(src.join("a.js"), "// c\nlet x=1;").unwrap();
    fs::write(src.join("b.min.js"), "/* keep */var b;").unwrap();
    fs::write(src.join("lib").join("c.ts"), "// keep\nlet c;").unwrap();

    cleancopy()
        .arg("--source")
        .arg(&src)
        .arg("--destination")
        .arg(&dest)
        .args(["--no-minified", "--exclude", "lib/", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 file(s), skipped 2 file(s)"));

    assert_eq!(fs::read_to_string(dest.join("a.js")).unwrap(), "let x=1;");
    assert_eq!(fs::read_to_string(dest.join("b.min.js")).unwrap(), "/* keep */var b;");
    assert_eq!(
        fs::read_to_string(dest.join("lib").join("c.ts")).unwrap(),
        "// keep\nlet c;"
    );
}

#[test]
fn test_foreign_destination_exits_one() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("photos");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dest).unwrap();
    fs::write(src.join("a.js"), "// c\n").unwrap();
    fs::write(dest.join("holiday.jpg"), [1u8, 2, 3]).unwrap();

    cleancopy()
        .arg("-s")
        .arg(&src)
        .arg("-d")
        .arg(&dest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("refusing to overwrite"));

    assert_eq!(fs::read(dest.join("holiday.jpg")).unwrap(), vec![1u8, 2, 3]);
    assert!(!dest.join("a.js").exists());
}

#[test]
fn test_second_run_replaces_previous_output() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("out");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.js"), "let a; // a\n").unwrap();

    for _ in 0..2 {
        cleancopy()
            .arg("-s")
            .arg(&src)
            .arg("-d")
            .arg(&dest)
            .assert()
            .success()
            .stdout(predicate::str::contains("CLEAN COPY COMPLETE"));
    }

    assert_eq!(fs::read_to_string(dest.join("a.js")).unwrap(), "let a;\n");
    assert_eq!(fs::read_to_string(src.join("a.js")).unwrap(), "let a; // a\n");
}

#[test]
fn test_generate_completions() {
    cleancopy()
        .args(["--generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleancopy"));
}
