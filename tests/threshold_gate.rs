use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_coverage-check"))
        .args(args)
        .output()
        .expect("run binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn blended_coverage_below_threshold_fails() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "85"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stdout(&out),
        "Total code coverage is 81.82 % which is below the accepted 85%\n"
    );
}

#[test]
fn line_coverage_below_threshold_fails() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "85", "--coverage-by-lines"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stdout(&out),
        "Total code coverage is 80.00 % which is below the accepted 85%\n"
    );
}

#[test]
fn only_percentage_when_threshold_met() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "75", "--only-percentage"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "81.82 %\n");
}

#[test]
fn only_percentage_below_threshold_still_fails() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "90", "--only-percentage"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "81.82 %\n");
}

#[test]
fn threshold_met_prints_ok() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "80"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Total code coverage is 81.82 % - OK!\n");
}

#[test]
fn zero_totals_are_insufficient_data() {
    let report = fixture("empty_project.xml");
    for threshold in ["0", "50", "100"] {
        let out = run(&[report.to_str().unwrap(), threshold]);
        assert_eq!(out.status.code(), Some(1));
        assert_eq!(
            stdout(&out),
            "Insufficient data for calculation. Please add more code.\n"
        );
    }
}

#[test]
fn threshold_is_clamped_to_percentage_range() {
    let report = fixture("project_only.xml");
    let path = report.to_str().unwrap();

    let above = run(&[path, "150"]);
    let hundred = run(&[path, "100"]);
    assert_eq!(above.status.code(), Some(1));
    assert_eq!(above.status.code(), hundred.status.code());
    assert_eq!(stdout(&above), stdout(&hundred));

    let below = run(&[path, "-20"]);
    let zero = run(&[path, "0"]);
    assert!(below.status.success());
    assert_eq!(stdout(&below), stdout(&zero));
}

#[test]
fn repeated_runs_are_identical() {
    let report = fixture("clover.xml");
    let first = run(&[report.to_str().unwrap(), "60"]);
    let second = run(&[report.to_str().unwrap(), "60"]);
    assert_eq!(first.status.code(), second.status.code());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_report_argument() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "Invalid input file  provided.\n");
}

#[test]
fn nonexistent_report() {
    let out = run(&["no/such/report.xml", "50"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "Invalid input file no/such/report.xml provided.\n");
}

#[test]
fn missing_threshold_argument() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stdout(&out),
        "An integer checked percentage must be given as second parameter.\n"
    );
}

#[test]
fn malformed_report_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<project><metrics statements=\"1\"></project>").unwrap();
    let out = run(&[path.to_str().unwrap(), "50"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Malformed coverage report: "));
}

#[test]
fn nested_clover_layout_uses_project_metrics() {
    let report = fixture("clover.xml");
    let out = run(&[report.to_str().unwrap(), "50", "--only-percentage"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "68.18 %\n");

    let lines = run(&[report.to_str().unwrap(), "50", "--only-percentage", "--coverage-by-lines"]);
    assert!(lines.status.success());
    assert_eq!(stdout(&lines), "70.00 %\n");
}

#[test]
fn threshold_reads_leading_number() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "80%"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Total code coverage is 81.82 % - OK!\n");

    let garbage = run(&[report.to_str().unwrap(), "abc"]);
    assert!(garbage.status.success());
    assert_eq!(stdout(&garbage), "Total code coverage is 81.82 % - OK!\n");
}

#[test]
fn huge_counters_do_not_crash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.xml");
    std::fs::write(
        &path,
        r#"<project><metrics statements="18446744073709551615" coveredstatements="1" methods="1" coveredmethods="1"/></project>"#,
    )
    .unwrap();
    let out = run(&[path.to_str().unwrap(), "0", "--only-percentage"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "0.00 %\n");
}

#[test]
fn latin1_report_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.xml");
    let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<project>
  <file name="Caf"#
        .to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(
        br#".php"><metrics statements="10" coveredstatements="9"/></file>
  <metrics statements="10" coveredstatements="9"/>
</project>"#,
    );
    std::fs::write(&path, bytes).unwrap();

    let out = run(&[path.to_str().unwrap(), "90", "--only-percentage", "Caf\u{e9}.php"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "90.00 %\n");
}

#[test]
fn undecodable_report_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.xml");
    std::fs::write(&path, b"<project><file name=\"\xFF\"/></project>").unwrap();
    let out = run(&[path.to_str().unwrap(), "50"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stdout(&out),
        "Malformed coverage report: content is not valid UTF-8\n"
    );
}

#[test]
fn usage_errors_print_on_stdout() {
    let report = fixture("project_only.xml");
    let out = run(&[report.to_str().unwrap(), "--bogus"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("--bogus"));
    assert!(out.stderr.is_empty());
}
