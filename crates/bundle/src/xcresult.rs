use serde_json::Value;
use std::path::Path;

use crate::runner::CommandRunner;
use xcdiag_model::{
    BuildError, BuildExtras, BuildResult, BuildWarning, CodeCoverage, FailedTest, FileCoverage,
};

/// Introspect a result bundle into a [`BuildResult`].
///
/// Returns `None` when the bundle path does not exist, the introspection tool
/// fails, or its output cannot be decoded — callers treat absence as "could
/// not introspect", never as a build failure.
#[must_use]
pub fn read_result_bundle(path: &Path, runner: &dyn CommandRunner) -> Option<BuildResult> {
    if !path.exists() {
        log::warn!("result bundle not found: {}", path.display());
        return None;
    }

    let path_arg = path.to_string_lossy();
    let output = match runner.run(
        "xcrun",
        &["xcresulttool", "get", "--format", "json", "--path", &path_arg],
    ) {
        Ok(output) => output,
        Err(err) => {
            log::warn!("xcresulttool failed to launch: {err}");
            return None;
        }
    };
    if !output.status_ok {
        log::warn!(
            "xcresulttool exited non-zero for {}: {}",
            path.display(),
            output.stderr.trim()
        );
        return None;
    }

    let document: Value = match serde_json::from_str(&output.stdout) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("undecodable xcresulttool output: {err}");
            return None;
        }
    };

    Some(build_result_from_document(&document))
}

/// Walk `actions[].actionResult.{issues, metrics, coverage}` into the model.
///
/// Unknown keys are ignored; the walk tolerates both plain JSON values and
/// the tool's `{"_value": …}` / `{"_values": […]}` wrapping.
fn build_result_from_document(document: &Value) -> BuildResult {
    let mut errors: Vec<BuildError> = Vec::new();
    let mut warnings: Vec<BuildWarning> = Vec::new();
    let mut failed_tests: Vec<FailedTest> = Vec::new();
    let mut tests_count: Option<usize> = None;
    let mut tests_failed_count: Option<usize> = None;
    let mut coverage: Option<CodeCoverage> = None;

    for action in elements(field(document, "actions")) {
        let Some(action_result) = field(action, "actionResult") else {
            continue;
        };

        if let Some(issues) = field(action_result, "issues") {
            for summary in elements(field(issues, "errorSummaries")) {
                let (file, line, column) = issue_location(summary);
                errors.push(BuildError {
                    file,
                    line,
                    column,
                    message: issue_message(summary),
                });
            }
            for summary in elements(field(issues, "warningSummaries")) {
                let (file, line, column) = issue_location(summary);
                warnings.push(BuildWarning {
                    file,
                    line,
                    column,
                    message: issue_message(summary),
                });
            }
            for summary in elements(field(issues, "testFailureSummaries")) {
                let (file, line, _) = issue_location(summary);
                let identifier = field(summary, "testCaseName")
                    .and_then(string_value)
                    .unwrap_or_else(|| "unknown".to_string());
                failed_tests.push(FailedTest {
                    identifier: identifier.replace('/', "."),
                    message: issue_message(summary),
                    file,
                    line,
                });
            }
        }

        if let Some(metrics) = field(action_result, "metrics") {
            if let Some(count) = field(metrics, "testsCount").and_then(usize_value) {
                tests_count = Some(tests_count.unwrap_or(0) + count);
            }
            if let Some(count) = field(metrics, "testsFailedCount").and_then(usize_value) {
                tests_failed_count = Some(tests_failed_count.unwrap_or(0) + count);
            }
        }

        if coverage.is_none() {
            coverage = read_coverage(field(action_result, "coverage"));
        }
    }

    let passed_test_count = tests_count
        .map(|count| count.saturating_sub(tests_failed_count.unwrap_or(failed_tests.len())));

    BuildResult::new(
        errors,
        warnings,
        failed_tests,
        Vec::new(),
        BuildExtras {
            passed_test_count,
            build_time: None,
            test_time: None,
            coverage,
        },
    )
}

fn read_coverage(coverage: Option<&Value>) -> Option<CodeCoverage> {
    let coverage = coverage?;
    let fraction = field(coverage, "lineCoverage").and_then(f64_value)?;

    let mut files = Vec::new();
    for file in elements(field(coverage, "files")) {
        let Some(path) = field(file, "path").and_then(string_value) else {
            continue;
        };
        let Some(file_fraction) = field(file, "lineCoverage").and_then(f64_value) else {
            continue;
        };
        files.push(FileCoverage {
            path,
            percent: file_fraction * 100.0,
        });
    }

    Some(CodeCoverage {
        line_coverage_percent: fraction * 100.0,
        files,
    })
}

fn issue_message(summary: &Value) -> String {
    field(summary, "message")
        .and_then(string_value)
        .unwrap_or_else(|| {
            field(summary, "issueType")
                .and_then(string_value)
                .unwrap_or_else(|| "unknown issue".to_string())
        })
}

/// `documentLocationInCreatingWorkspace.url` is a `file://` URL whose fragment
/// carries 0-based `StartingLineNumber`/`StartingColumnNumber` parameters.
fn issue_location(summary: &Value) -> (Option<String>, Option<u32>, Option<u32>) {
    let Some(url) = field(summary, "documentLocationInCreatingWorkspace")
        .and_then(|location| field(location, "url"))
        .and_then(string_value)
    else {
        return (None, None, None);
    };

    let trimmed = url.strip_prefix("file://").unwrap_or(&url);
    let (path, fragment) = match trimmed.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (trimmed, None),
    };

    let mut line = None;
    let mut column = None;
    if let Some(fragment) = fragment {
        for pair in fragment.split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let parsed: Option<u32> = raw.parse().ok();
            match key {
                "StartingLineNumber" => line = parsed.map(|n| n + 1),
                "StartingColumnNumber" => column = parsed.map(|n| n + 1),
                _ => {}
            }
        }
    }

    (Some(path.to_string()), line, column)
}

/// `{"_value": x}` → `x`, anything else unchanged.
pub(crate) fn unwrap_value(value: &Value) -> &Value {
    value.get("_value").unwrap_or(value)
}

/// Field access through the `_value` wrapping.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    unwrap_value(value).get(key)
}

/// `{"_values": […]}` or a plain array → element iterator; otherwise empty.
pub(crate) fn elements<'a>(value: Option<&'a Value>) -> Vec<&'a Value> {
    let Some(value) = value else {
        return Vec::new();
    };
    let unwrapped = unwrap_value(value);
    let array = unwrapped
        .get("_values")
        .and_then(Value::as_array)
        .or_else(|| unwrapped.as_array());
    array.map(|items| items.iter().collect()).unwrap_or_default()
}

pub(crate) fn string_value(value: &Value) -> Option<String> {
    unwrap_value(value).as_str().map(str::to_string)
}

pub(crate) fn f64_value(value: &Value) -> Option<f64> {
    let value = unwrap_value(value);
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

pub(crate) fn usize_value(value: &Value) -> Option<usize> {
    let value = unwrap_value(value);
    value
        .as_u64()
        .map(|n| n as usize)
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
