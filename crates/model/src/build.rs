use serde::{Deserialize, Serialize};

/// Overall outcome of a build or test invocation.
///
/// The status is a strict function of the parsed diagnostics: a result is
/// `Failed` iff it carries errors, failed tests, or linker errors. Terminal
/// log wording ("** BUILD FAILED **") never overrides this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Succeeded,
    Failed,
}

/// A compiler error with optional source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildError {
    /// Source file path, when the diagnostic carried one
    pub file: Option<String>,

    /// 1-based line number
    pub line: Option<u32>,

    /// 1-based column number
    pub column: Option<u32>,

    /// Diagnostic message text
    pub message: String,
}

/// A compiler warning with optional source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Source file path, when the diagnostic carried one
    pub file: Option<String>,

    /// 1-based line number
    pub line: Option<u32>,

    /// 1-based column number
    pub column: Option<u32>,

    /// Diagnostic message text
    pub message: String,
}

/// A single failed test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTest {
    /// Test identifier in `Suite.test` form
    pub identifier: String,

    /// Assertion/failure message
    pub message: String,

    /// Source file of the failing assertion, when known
    pub file: Option<String>,

    /// 1-based line of the failing assertion, when known
    pub line: Option<u32>,
}

/// An undefined-symbol linker diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkerError {
    /// The undefined symbol name
    pub symbol: String,

    /// Architecture the link failed for (e.g. `arm64`)
    pub architecture: String,

    /// Object/module that referenced the symbol
    pub referenced_from: String,
}

/// Line coverage for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub path: String,
    pub percent: f64,
}

/// Code coverage for one invocation, file order preserved from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCoverage {
    pub line_coverage_percent: f64,

    #[serde(default)]
    pub files: Vec<FileCoverage>,
}

/// Aggregate counts and timings for one invocation.
///
/// The four counts always equal the lengths of the corresponding collections
/// on the containing [`BuildResult`]; [`BuildResult::new`] derives them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub failed_test_count: usize,
    pub linker_error_count: usize,

    /// Number of tests that passed, when a test summary was seen
    pub passed_test_count: Option<usize>,

    /// Build duration as reported by the tool (e.g. `12.345 sec`)
    pub build_time: Option<String>,

    /// Test-run duration as reported by the tool (e.g. `1.456 seconds`)
    pub test_time: Option<String>,

    /// Overall line coverage percent, when coverage was collected
    pub coverage_percent: Option<f64>,
}

/// Structured result of one build or test invocation.
///
/// Constructed once per parse, immutable afterwards, passed by value to the
/// formatters. Both the text extractor and the result-bundle parser converge
/// on this type, so downstream rendering is agnostic to origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResult {
    pub status: BuildStatus,
    pub summary: BuildSummary,
    pub errors: Vec<BuildError>,
    pub warnings: Vec<BuildWarning>,
    pub failed_tests: Vec<FailedTest>,
    pub linker_errors: Vec<LinkerError>,
    pub coverage: Option<CodeCoverage>,
}

/// Optional fields a parser may have recovered beyond the diagnostics
/// themselves (timings, passed-test counts, coverage).
#[derive(Debug, Clone, Default)]
pub struct BuildExtras {
    pub passed_test_count: Option<usize>,
    pub build_time: Option<String>,
    pub test_time: Option<String>,
    pub coverage: Option<CodeCoverage>,
}

impl BuildResult {
    /// Assemble a result from parsed diagnostics.
    ///
    /// Derives the summary counts from the collections and the status from
    /// the strict rule: failed iff any error, failed test, or linker error
    /// is present.
    #[must_use]
    pub fn new(
        errors: Vec<BuildError>,
        warnings: Vec<BuildWarning>,
        failed_tests: Vec<FailedTest>,
        linker_errors: Vec<LinkerError>,
        extras: BuildExtras,
    ) -> Self {
        let status =
            if errors.is_empty() && failed_tests.is_empty() && linker_errors.is_empty() {
                BuildStatus::Succeeded
            } else {
                BuildStatus::Failed
            };

        let coverage_percent = extras
            .coverage
            .as_ref()
            .map(|coverage| coverage.line_coverage_percent);

        let summary = BuildSummary {
            error_count: errors.len(),
            warning_count: warnings.len(),
            failed_test_count: failed_tests.len(),
            linker_error_count: linker_errors.len(),
            passed_test_count: extras.passed_test_count,
            build_time: extras.build_time,
            test_time: extras.test_time,
            coverage_percent,
        };

        Self {
            status,
            summary,
            errors,
            warnings,
            failed_tests,
            linker_errors,
            coverage: extras.coverage,
        }
    }

    /// An empty, successful result (no diagnostics of any kind).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras::default(),
        )
    }

    /// Whether the invocation succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, BuildStatus::Succeeded)
    }

    /// Total number of executed tests (passed + failed), when known.
    ///
    /// `None` means no test summary of any kind was observed, which is
    /// distinct from "zero tests ran".
    #[must_use]
    pub fn executed_test_count(&self) -> Option<usize> {
        if self.summary.passed_test_count.is_none() && self.failed_tests.is_empty() {
            return None;
        }
        Some(self.summary.passed_test_count.unwrap_or(0) + self.summary.failed_test_count)
    }
}

impl Default for BuildResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error(message: &str) -> BuildError {
        BuildError {
            file: None,
            line: None,
            column: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn counts_match_collections() {
        let result = BuildResult::new(
            vec![error("a"), error("b")],
            vec![BuildWarning {
                file: None,
                line: None,
                column: None,
                message: "w".to_string(),
            }],
            Vec::new(),
            Vec::new(),
            BuildExtras::default(),
        );

        assert_eq!(result.summary.error_count, result.errors.len());
        assert_eq!(result.summary.warning_count, result.warnings.len());
        assert_eq!(result.summary.failed_test_count, result.failed_tests.len());
        assert_eq!(
            result.summary.linker_error_count,
            result.linker_errors.len()
        );
    }

    #[test]
    fn status_is_strict_function_of_diagnostics() {
        assert_eq!(BuildResult::empty().status, BuildStatus::Succeeded);

        let failed = BuildResult::new(
            vec![error("boom")],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras::default(),
        );
        assert_eq!(failed.status, BuildStatus::Failed);

        let linker_only = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![LinkerError {
                symbol: "_missing".to_string(),
                architecture: "arm64".to_string(),
                referenced_from: "main.o".to_string(),
            }],
            BuildExtras::default(),
        );
        assert_eq!(linker_only.status, BuildStatus::Failed);
    }

    #[test]
    fn executed_test_count_distinguishes_unknown_from_zero() {
        assert_eq!(BuildResult::empty().executed_test_count(), None);

        let ran_zero = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras {
                passed_test_count: Some(0),
                ..BuildExtras::default()
            },
        );
        assert_eq!(ran_zero.executed_test_count(), Some(0));

        let ran_some = BuildResult::new(
            Vec::new(),
            Vec::new(),
            vec![FailedTest {
                identifier: "Suite.test".to_string(),
                message: "failed".to_string(),
                file: None,
                line: None,
            }],
            Vec::new(),
            BuildExtras {
                passed_test_count: Some(3),
                ..BuildExtras::default()
            },
        );
        assert_eq!(ran_some.executed_test_count(), Some(4));
    }

    #[test]
    fn coverage_percent_mirrors_coverage() {
        let result = BuildResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            BuildExtras {
                coverage: Some(CodeCoverage {
                    line_coverage_percent: 81.25,
                    files: Vec::new(),
                }),
                ..BuildExtras::default()
            },
        );
        assert_eq!(result.summary.coverage_percent, Some(81.25));
    }
}
