use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lambda_census"))
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.cpp"),
        "int main() {\n  auto f = [](int x) { return x; };\n  return f(1);\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("b.cc"), "void g() {\n").unwrap();
    fs::write(dir.path().join("c.txt"), "[]{}\n").unwrap();
    dir
}

#[test]
fn shows_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lambda_census"))
        .stdout(predicate::str::contains("--sample-probability"));
}

#[test]
fn csv_reports_counts_and_skips() {
    let dir = fixture();
    bin()
        .args(["--format", "csv", "--sample-probability", "0"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("path,count\n"))
        .stdout(predicate::str::contains("a.cpp,1"))
        .stdout(predicate::str::contains("b.cc,-1"))
        .stdout(predicate::str::contains("c.txt").not());
}

#[test]
fn json_summary() {
    let dir = fixture();
    let output = bin()
        .args(["--format", "json", "--total-only"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["summary"]["lambdas"], 1);
    assert_eq!(v["summary"]["skipped_files"], 1);
    assert_eq!(v["summary"]["files"], 2);
}

#[test]
fn writes_samples_and_summary_files() {
    let dir = fixture();
    let out = tempfile::tempdir().unwrap();
    let samples = out.path().join("sample.txt");
    let summary = out.path().join("count.csv");

    bin()
        .args(["--format", "tsv", "--sample-probability", "1"])
        .arg("--samples-out")
        .arg(&samples)
        .arg("--summary-out")
        .arg(&summary)
        .arg(dir.path())
        .assert()
        .success();

    let text = fs::read_to_string(&samples).unwrap();
    assert!(text.starts_with("<sample path=\""));
    assert!(text.contains("a.cpp\" position=\"24\">\n"));
    assert!(text.contains("auto f = [](int x) { return x; };"));
    assert!(text.ends_with("\n</sample>\n"));

    assert_eq!(
        fs::read_to_string(&summary).unwrap(),
        "key,value\nlambdas,1\nskipped_files,1\nfiles,2\n"
    );
}

#[test]
fn missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg(dir.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn rejects_unknown_format() {
    bin().args(["--format", "xml"]).assert().failure();
}
