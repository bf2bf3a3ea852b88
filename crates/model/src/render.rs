//! Fixed-format renderers over [`BuildResult`].
//!
//! Downstream consumers pattern-match the headline phrases and count lines,
//! so the wording here is load-bearing. Keep changes additive.

use crate::build::{BuildError, BuildResult, BuildWarning};

/// Render a build-oriented report.
#[must_use]
pub fn format_build_report(result: &BuildResult) -> String {
    let mut out = String::new();

    if result.succeeded() {
        match &result.summary.build_time {
            Some(duration) => out.push_str(&format!("Build succeeded ({duration})")),
            None => out.push_str("Build succeeded"),
        }
    } else {
        out.push_str("Build failed");
    }

    push_diagnostic_sections(&mut out, result);
    out
}

/// Render a test-oriented report.
#[must_use]
pub fn format_test_report(result: &BuildResult) -> String {
    let mut out = String::new();

    let failed = result.summary.failed_test_count;
    let passed = result.summary.passed_test_count;
    let duration = result.summary.test_time.as_deref();

    if result.succeeded() {
        let mut segments: Vec<String> = Vec::new();
        if let Some(passed) = passed {
            segments.push(format!("{passed} passed"));
        }
        if let Some(duration) = duration {
            segments.push(duration.to_string());
        }
        if segments.is_empty() {
            out.push_str("Tests passed");
        } else {
            out.push_str(&format!("Tests passed ({})", segments.join(", ")));
        }
    } else {
        let mut segments: Vec<String> = vec![format!("{failed} failed")];
        if let Some(passed) = passed {
            segments.push(format!("{passed} passed"));
        }
        if let Some(duration) = duration {
            segments.push(duration.to_string());
        }
        out.push_str(&format!("Tests failed ({})", segments.join(", ")));
    }

    if !result.failed_tests.is_empty() {
        out.push_str("\nFailed tests:");
        for test in &result.failed_tests {
            out.push_str(&format!("\n  {} — {}", test.identifier, test.message));
            if let (Some(file), Some(line)) = (&test.file, test.line) {
                out.push_str(&format!(" ({file}:{line})"));
            }
        }
    }

    push_diagnostic_sections(&mut out, result);

    if let Some(coverage) = &result.coverage {
        out.push_str(&format!(
            "\nCoverage: {:.1}%",
            coverage.line_coverage_percent
        ));
        for file in &coverage.files {
            out.push_str(&format!("\n  {}: {:.1}%", file.path, file.percent));
        }
    }

    out
}

/// `1 error` vs `2 errors`.
#[must_use]
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn push_diagnostic_sections(out: &mut String, result: &BuildResult) {
    if !result.errors.is_empty() {
        out.push_str(&format!(
            "\n{}:",
            pluralize(result.summary.error_count, "error")
        ));
        for error in &result.errors {
            out.push_str(&format!("\n  {}", render_error(error)));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str(&format!(
            "\n{}:",
            pluralize(result.summary.warning_count, "warning")
        ));
        for warning in &result.warnings {
            out.push_str(&format!("\n  {}", render_warning(warning)));
        }
    }

    if !result.linker_errors.is_empty() {
        out.push_str(&format!(
            "\n{}:",
            pluralize(result.summary.linker_error_count, "linker error")
        ));
        for linker in &result.linker_errors {
            out.push_str(&format!(
                "\n  Undefined symbol '{}' for {} (referenced from {})",
                linker.symbol, linker.architecture, linker.referenced_from
            ));
        }
    }
}

fn render_error(error: &BuildError) -> String {
    render_located(
        error.file.as_deref(),
        error.line,
        error.column,
        &error.message,
    )
}

fn render_warning(warning: &BuildWarning) -> String {
    render_located(
        warning.file.as_deref(),
        warning.line,
        warning.column,
        &warning.message,
    )
}

fn render_located(
    file: Option<&str>,
    line: Option<u32>,
    column: Option<u32>,
    message: &str,
) -> String {
    match (file, line, column) {
        (Some(file), Some(line), Some(column)) => format!("{file}:{line}:{column} {message}"),
        (Some(file), Some(line), None) => format!("{file}:{line} {message}"),
        (Some(file), None, _) => format!("{file} {message}"),
        (None, _, _) => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildExtras, CodeCoverage, FailedTest, FileCoverage, LinkerError};
    use pretty_assertions::assert_eq;

    fn error_at(file: &str, line: u32, column: u32, message: &str) -> BuildError {
        BuildError {
            file: Some(file.to_string()),
            line: Some(line),
            column: Some(column),
            message: message.to_string(),
        }
    }

    #[test]
    fn build_success_with_duration() {
        let result = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras {
                build_time: Some("12.345 sec".to_string()),
                ..BuildExtras::default()
            },
        );
        assert_eq!(format_build_report(&result), "Build succeeded (12.345 sec)");
    }

    #[test]
    fn build_failure_lists_single_error() {
        let result = BuildResult::new(
            vec![error_at("main.swift", 10, 5, "cannot find 'x' in scope")],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras::default(),
        );
        let report = format_build_report(&result);
        assert!(report.starts_with("Build failed"));
        assert!(report.contains("1 error"));
        assert!(report.contains("main.swift:10:5 cannot find 'x' in scope"));
    }

    #[test]
    fn error_prefix_degrades_with_missing_fields() {
        assert_eq!(
            render_located(Some("a.swift"), Some(3), None, "msg"),
            "a.swift:3 msg"
        );
        assert_eq!(render_located(None, Some(3), Some(1), "msg"), "msg");
    }

    #[test]
    fn linker_errors_render_symbol_and_arch() {
        let result = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![LinkerError {
                symbol: "_OBJC_CLASS_$_Foo".to_string(),
                architecture: "arm64".to_string(),
                referenced_from: "Bar.o".to_string(),
            }],
            BuildExtras::default(),
        );
        let report = format_build_report(&result);
        assert!(report.contains("1 linker error:"));
        assert!(report.contains("Undefined symbol '_OBJC_CLASS_$_Foo' for arm64"));
        assert!(report.contains("referenced from Bar.o"));
    }

    #[test]
    fn test_report_headlines() {
        let passing = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras {
                passed_test_count: Some(8),
                test_time: Some("1.456 seconds".to_string()),
                ..BuildExtras::default()
            },
        );
        assert_eq!(
            format_test_report(&passing),
            "Tests passed (8 passed, 1.456 seconds)"
        );

        let failing = BuildResult::new(
            Vec::new(),
            Vec::new(),
            vec![FailedTest {
                identifier: "Suite.testOne".to_string(),
                message: "XCTAssertEqual failed".to_string(),
                file: Some("Tests.swift".to_string()),
                line: Some(25),
            }],
            Vec::new(),
            BuildExtras {
                passed_test_count: Some(8),
                test_time: Some("1.456 seconds".to_string()),
                ..BuildExtras::default()
            },
        );
        let report = format_test_report(&failing);
        assert!(report.starts_with("Tests failed (1 failed, 8 passed, 1.456 seconds)"));
        assert!(report.contains("Suite.testOne — XCTAssertEqual failed (Tests.swift:25)"));
    }

    #[test]
    fn coverage_rendered_only_when_present() {
        let without = BuildResult::empty();
        assert!(!format_test_report(&without).contains("Coverage:"));

        let with = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras {
                coverage: Some(CodeCoverage {
                    line_coverage_percent: 85.0,
                    files: vec![FileCoverage {
                        path: "Sources/App.swift".to_string(),
                        percent: 72.5,
                    }],
                }),
                ..BuildExtras::default()
            },
        );
        let report = format_test_report(&with);
        assert!(report.contains("Coverage: 85.0%"));
        assert!(report.contains("Sources/App.swift: 72.5%"));
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(1, "error"), "1 error");
        assert_eq!(pluralize(2, "error"), "2 errors");
        assert_eq!(pluralize(0, "warning"), "0 warnings");
    }
}
