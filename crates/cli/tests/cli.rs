use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn xcdiag() -> Command {
    Command::cargo_bin("xcdiag").expect("binary builds")
}

#[test]
fn build_log_success_prints_report() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log = temp.path().join("build.log");
    fs::write(&log, "** BUILD SUCCEEDED ** [3.2 sec]\n").expect("write log");

    xcdiag()
        .arg("build-log")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build succeeded (3.2 sec)"));
}

#[test]
fn build_log_failure_exits_nonzero_with_diagnostics() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log = temp.path().join("build.log");
    fs::write(
        &log,
        "main.swift:10:5: error: cannot find 'x' in scope\n** BUILD FAILED **\n",
    )
    .expect("write log");

    xcdiag()
        .arg("build-log")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 error"))
        .stderr(predicate::str::contains(
            "main.swift:10:5 cannot find 'x' in scope",
        ));
}

#[test]
fn test_log_zero_tests_with_filter_is_enriched_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log = temp.path().join("test.log");
    fs::write(&log, "** TEST SUCCEEDED **\n").expect("write log");

    xcdiag()
        .arg("test-log")
        .arg(&log)
        .arg("--only-testing")
        .arg("T/Wrong")
        .arg("--project-root")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No tests matched the only_testing filter",
        ))
        .stderr(predicate::str::contains("'T/Wrong'"));
}

#[test]
fn debugger_classifies_crash_and_noise() {
    let temp = tempfile::tempdir().expect("tempdir");
    let crash = temp.path().join("crash.txt");
    fs::write(&crash, "* thread #1, stop reason = signal SIGSEGV\n").expect("write");
    xcdiag()
        .arg("debugger")
        .arg(&crash)
        .assert()
        .success()
        .stdout(predicate::str::contains("crash detected"));

    let benign = temp.path().join("benign.txt");
    fs::write(&benign, "* thread #1, stop reason = breakpoint 1.1\n").expect("write");
    xcdiag()
        .arg("debugger")
        .arg(&benign)
        .assert()
        .success()
        .stdout(predicate::str::contains("no crash detected"));
}

#[test]
fn crash_summary_from_report_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let report = temp.path().join("report.ips");
    fs::write(
        &report,
        r#"{"procName": "MyApp", "termination": {"namespace": "SIGNAL", "indicator": "11"}}"#,
    )
    .expect("write");

    xcdiag()
        .arg("crash")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Process: MyApp"))
        .stdout(predicate::str::contains("Termination: SIGNAL — 11"));
}

#[test]
fn previews_lists_blocks() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("View.swift");
    fs::write(
        &source,
        "#Preview(\"Dark\") { ContentView() }\n#PreviewMacro { NotOne() }\n",
    )
    .expect("write");

    xcdiag()
        .arg("previews")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Dark"))
        .stdout(predicate::str::contains("ContentView()"))
        .stdout(predicate::str::contains("NotOne()").not());
}
