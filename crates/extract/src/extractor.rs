use once_cell::sync::Lazy;
use regex::Regex;
use xcdiag_model::{
    BuildError, BuildExtras, BuildResult, BuildWarning, FailedTest, LinkerError, pluralize,
};

/// `FILE:LINE[:COL]: error|warning: MESSAGE`
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<file>[^:\s][^:]*):(?P<line>\d+)(?::(?P<col>\d+))?: (?P<sev>error|warning): (?P<msg>.+)$")
        .expect("diagnostic regex")
});

/// `Test Case '-[Suite test]' passed|failed (T seconds).`
static TEST_CASE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Test Case '-\[(?P<suite>\S+) (?P<test>[^\]]+)\]' (?P<outcome>passed|failed) \((?P<time>[0-9.]+) seconds\)\.?$",
    )
    .expect("test case regex")
});

/// `FILE:LINE: error: -[Suite test] : MESSAGE` — XCTest assertion detail
static TEST_ASSERTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-\[(?P<suite>\S+) (?P<test>[^\]]+)\] : (?P<msg>.*)$",
    )
    .expect("assertion regex")
});

/// `Executed N tests, with F failures (U unexpected) in T (...) seconds`
static EXECUTED_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Executed (?P<n>\d+) tests?, with (?P<f>\d+) failures?(?: \(\d+ unexpected\))? in (?P<t>[0-9.]+)(?: \([0-9.]+\))? seconds",
    )
    .expect("executed summary regex")
});

/// `** BUILD SUCCEEDED ** [12.345 sec]` and friends
static TERMINAL_STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\* (?:BUILD|TEST|CLEAN) (?:SUCCEEDED|FAILED|INTERRUPTED) \*\*(?: \[(?P<dur>[0-9.]+) sec\])?")
        .expect("terminal status regex")
});

static UNDEFINED_SYMBOLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Undefined symbols for architecture (?P<arch>\S+):").expect("linker arch regex")
});

static LINKER_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s+"(?P<sym>[^"]+)", referenced from:"#).expect("linker symbol regex")
});

static LINKER_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+\S.* in (?P<obj>\S+)$").expect("linker reference regex"));

/// Extract a structured [`BuildResult`] from raw build/test console output.
///
/// Total function: every input yields a result, unrecognized lines are
/// skipped. A body with no diagnostics yields a successful result with all
/// counts zero regardless of terminal wording.
#[must_use]
pub fn extract_build_results(output: &str) -> BuildResult {
    let mut state = Extraction::default();

    for line in output.lines() {
        state.consume(line.trim_end());
    }
    state.finish()
}

#[derive(Default)]
struct Extraction {
    errors: Vec<BuildError>,
    warnings: Vec<BuildWarning>,
    failed_tests: Vec<FailedTest>,
    linker_errors: Vec<LinkerError>,

    /// Assertion details seen before their `Test Case ... failed` line
    pending_assertions: Vec<FailedTest>,
    passed_cases: usize,
    saw_case_lines: bool,

    summary_executed: Option<usize>,
    summary_failures: Option<usize>,
    test_time: Option<String>,
    build_time: Option<String>,

    linker_arch: Option<String>,
    linker_symbol: Option<String>,
}

impl Extraction {
    fn consume(&mut self, line: &str) {
        if self.consume_linker(line) {
            return;
        }
        if self.consume_test_case(line) {
            return;
        }
        if self.consume_diagnostic(line) {
            return;
        }
        if let Some(caps) = EXECUTED_SUMMARY.captures(line) {
            // per-suite summaries precede the overall one; the last wins
            self.summary_executed = caps["n"].parse().ok();
            self.summary_failures = caps["f"].parse().ok();
            self.test_time = Some(format!("{} seconds", &caps["t"]));
            return;
        }
        if let Some(caps) = TERMINAL_STATUS.captures(line) {
            if let Some(duration) = caps.name("dur") {
                self.build_time = Some(format!("{} sec", duration.as_str()));
            }
        }
    }

    /// Multi-line `Undefined symbols for architecture …:` block.
    fn consume_linker(&mut self, line: &str) -> bool {
        if let Some(caps) = UNDEFINED_SYMBOLS.captures(line) {
            self.flush_linker_symbol();
            self.linker_arch = Some(caps["arch"].to_string());
            return true;
        }

        let Some(arch) = self.linker_arch.clone() else {
            return false;
        };

        if let Some(caps) = LINKER_SYMBOL.captures(line) {
            self.flush_linker_symbol();
            self.linker_symbol = Some(caps["sym"].to_string());
            return true;
        }

        if let Some(symbol) = self.linker_symbol.take() {
            if let Some(caps) = LINKER_REFERENCE.captures(line) {
                self.push_linker(LinkerError {
                    symbol,
                    architecture: arch,
                    referenced_from: caps["obj"].to_string(),
                });
                return true;
            }
            self.linker_symbol = Some(symbol);
        }

        if line.starts_with("ld:") {
            // `ld: symbol(s) not found for architecture …` ends the block
            self.flush_linker_symbol();
            self.linker_arch = None;
        }
        false
    }

    fn consume_test_case(&mut self, line: &str) -> bool {
        let Some(caps) = TEST_CASE_LINE.captures(line) else {
            return false;
        };
        self.saw_case_lines = true;
        let identifier = format!("{}.{}", &caps["suite"], &caps["test"]);

        if &caps["outcome"] == "passed" {
            self.passed_cases += 1;
            return true;
        }

        // an assertion line may already have carried the message
        let pending = self
            .pending_assertions
            .iter()
            .position(|t| t.identifier == identifier)
            .map(|idx| self.pending_assertions.remove(idx));
        let failed = pending.unwrap_or(FailedTest {
            identifier,
            message: "failed".to_string(),
            file: None,
            line: None,
        });
        if !self.failed_tests.iter().any(|t| t == &failed) {
            self.failed_tests.push(failed);
        }
        true
    }

    fn consume_diagnostic(&mut self, line: &str) -> bool {
        let Some(caps) = DIAGNOSTIC_LINE.captures(line) else {
            return false;
        };
        let file = caps["file"].to_string();
        let line_no: Option<u32> = caps["line"].parse().ok();
        let column: Option<u32> = caps.name("col").and_then(|c| c.as_str().parse().ok());
        let message = caps["msg"].to_string();

        if &caps["sev"] == "error" {
            if let Some(assertion) = TEST_ASSERTION.captures(&message) {
                self.record_assertion(
                    format!("{}.{}", &assertion["suite"], &assertion["test"]),
                    assertion["msg"].to_string(),
                    file,
                    line_no,
                );
                return true;
            }
            let error = BuildError {
                file: Some(file),
                line: line_no,
                column,
                message,
            };
            if !self.errors.contains(&error) {
                self.errors.push(error);
            }
        } else {
            let warning = BuildWarning {
                file: Some(file),
                line: line_no,
                column,
                message,
            };
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
        true
    }

    /// Attach an assertion message to its failed test, whichever side of the
    /// `Test Case` line it appeared on.
    fn record_assertion(
        &mut self,
        identifier: String,
        message: String,
        file: String,
        line: Option<u32>,
    ) {
        if let Some(existing) = self
            .failed_tests
            .iter_mut()
            .find(|t| t.identifier == identifier)
        {
            if existing.message == "failed" {
                existing.message = message;
                existing.file = Some(file);
                existing.line = line;
            }
            return;
        }
        if self
            .pending_assertions
            .iter()
            .any(|t| t.identifier == identifier)
        {
            return;
        }
        self.pending_assertions.push(FailedTest {
            identifier,
            message,
            file: Some(file),
            line,
        });
    }

    fn push_linker(&mut self, error: LinkerError) {
        if !self.linker_errors.contains(&error) {
            self.linker_errors.push(error);
        }
    }

    fn flush_linker_symbol(&mut self) {
        if let (Some(symbol), Some(arch)) = (self.linker_symbol.take(), self.linker_arch.clone()) {
            self.push_linker(LinkerError {
                symbol,
                architecture: arch,
                referenced_from: "unknown".to_string(),
            });
        }
    }

    fn finish(mut self) -> BuildResult {
        self.flush_linker_symbol();

        // assertion lines whose `Test Case` line never arrived still count
        for pending in std::mem::take(&mut self.pending_assertions) {
            if !self
                .failed_tests
                .iter()
                .any(|t| t.identifier == pending.identifier)
            {
                self.failed_tests.push(pending);
            }
        }

        // a summary reporting failures we never saw case lines for keeps the
        // run marked failed rather than silently succeeding
        if let Some(reported) = self.summary_failures {
            if reported > 0 && self.failed_tests.is_empty() {
                log::debug!("{reported} reported test failures had no matching case lines");
                self.failed_tests.push(FailedTest {
                    identifier: "unknown".to_string(),
                    message: format!(
                        "{} not matched to individual case lines",
                        pluralize(reported, "reported test failure")
                    ),
                    file: None,
                    line: None,
                });
            }
        }

        let passed_test_count = if self.saw_case_lines {
            Some(self.passed_cases)
        } else {
            match (self.summary_executed, self.summary_failures) {
                (Some(executed), Some(failures)) => Some(executed.saturating_sub(failures)),
                _ => None,
            }
        };

        BuildResult::new(
            self.errors,
            self.warnings,
            self.failed_tests,
            self.linker_errors,
            BuildExtras {
                passed_test_count,
                build_time: self.build_time,
                test_time: self.test_time,
                coverage: None,
            },
        )
    }
}
