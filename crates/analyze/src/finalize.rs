use std::path::PathBuf;

use crate::error::{Result, RunFailure};
use crate::infra::detect_infrastructure_issue;
use crate::scheme::{schemes_declaring_target, suggestion_clause};
use xcdiag_model::{format_build_report, format_test_report, BuildResult};

/// Invocation context the tool layer carries into test-run finalization.
#[derive(Debug, Clone, Default)]
pub struct TestRunContext {
    /// Explicit test-selector identifiers requested by the caller
    /// (`Target/Case/test` form). Empty means "run everything".
    pub only_testing: Vec<String>,

    /// Project root directory, used for scheme discovery fallback
    pub project_root: PathBuf,

    /// The project bundle path (`…/App.xcodeproj`)
    pub project_path: PathBuf,
}

/// Turn a parsed build result plus raw stderr into the operator-facing
/// report, or a [`RunFailure`] carrying that report when the build failed.
///
/// The infrastructure warning, when present, is appended either way.
pub fn finalize_build_run(result: &BuildResult, stderr: &str) -> Result<String> {
    let report = with_infrastructure_warning(format_build_report(result), stderr);
    if result.succeeded() {
        Ok(report)
    } else {
        Err(RunFailure::new(report))
    }
}

/// Turn a parsed test result plus raw stderr and invocation context into the
/// operator-facing report or a [`RunFailure`].
///
/// Zero executed tests under an explicit `only_testing` filter is promoted to
/// a hard failure even when the tool reported success, naming every requested
/// identifier and suggesting alternative schemes when one declares the
/// requested target. Without an explicit filter, zero executed tests may be a
/// legitimately empty suite and is not an error.
pub fn finalize_test_run(
    result: &BuildResult,
    stderr: &str,
    context: &TestRunContext,
) -> Result<String> {
    if !context.only_testing.is_empty() && result.executed_test_count().unwrap_or(0) == 0 {
        let quoted: Vec<String> = context
            .only_testing
            .iter()
            .map(|id| format!("'{id}'"))
            .collect();
        let mut message = format!(
            "No tests matched the only_testing filter: {}",
            quoted.join(", ")
        );
        if let Some(clause) = probe_scheme_suggestion(context) {
            message.push(' ');
            message.push_str(&clause);
        }
        return Err(RunFailure::new(with_infrastructure_warning(
            message, stderr,
        )));
    }

    let report = with_infrastructure_warning(format_test_report(result), stderr);
    if result.succeeded() {
        Ok(report)
    } else {
        Err(RunFailure::new(report))
    }
}

/// A requested selector may carry the test target in any `/` position, so
/// probe every segment and keep the first one any scheme declares.
fn probe_scheme_suggestion(context: &TestRunContext) -> Option<String> {
    for selector in &context.only_testing {
        for segment in selector.split('/').filter(|segment| !segment.is_empty()) {
            let schemes =
                schemes_declaring_target(&context.project_root, &context.project_path, segment);
            if let Some(clause) = suggestion_clause(segment, &schemes) {
                return Some(clause);
            }
        }
    }
    None
}

fn with_infrastructure_warning(report: String, stderr: &str) -> String {
    match detect_infrastructure_issue(stderr) {
        Some(issue) => format!("{report}\n{}", issue.warning_line()),
        None => report,
    }
}
