/// Known test-infrastructure daemon failures, distinct from test failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfrastructureIssue {
    /// testmanagerd died with a signal/exception
    TestManagerCrashed,
    /// the connection to testmanagerd went away without a crash indicator
    TestManagerTerminated,
    /// the test runner daemon family died
    TestRunnerDaemonCrashed,
}

impl InfrastructureIssue {
    /// The exact warning line appended to formatted output. Other systems
    /// pattern-match these phrases; do not reword.
    #[must_use]
    pub const fn warning_line(self) -> &'static str {
        match self {
            Self::TestManagerCrashed => "Warning: testmanagerd crashed",
            Self::TestManagerTerminated => "Warning: testmanagerd terminated unexpectedly",
            Self::TestRunnerDaemonCrashed => "Warning: The test runner daemon crashed",
        }
    }
}

/// Fixed stderr substrings identifying each daemon failure. Checked in table
/// order; the first hit wins so a crash indicator outranks the
/// lost-connection phrasing for the same daemon.
const INFRASTRUCTURE_SIGNATURES: &[(&str, InfrastructureIssue)] = &[
    (
        "testmanagerd crashed",
        InfrastructureIssue::TestManagerCrashed,
    ),
    (
        "testmanagerd exited due to signal",
        InfrastructureIssue::TestManagerCrashed,
    ),
    (
        "Lost connection to testmanagerd",
        InfrastructureIssue::TestManagerTerminated,
    ),
    (
        "Connection with testmanagerd was invalidated",
        InfrastructureIssue::TestManagerTerminated,
    ),
    (
        "testmanagerd quit unexpectedly",
        InfrastructureIssue::TestManagerTerminated,
    ),
    (
        "testRunnerd exited due to signal",
        InfrastructureIssue::TestRunnerDaemonCrashed,
    ),
    (
        "Lost connection to testRunnerd",
        InfrastructureIssue::TestRunnerDaemonCrashed,
    ),
];

/// Scan stderr for a known daemon-failure signature.
///
/// Returns at most one issue regardless of how many signatures match;
/// absence of any matching substring yields `None`.
#[must_use]
pub fn detect_infrastructure_issue(stderr: &str) -> Option<InfrastructureIssue> {
    if stderr.is_empty() {
        return None;
    }
    INFRASTRUCTURE_SIGNATURES
        .iter()
        .find(|(needle, _)| stderr.contains(needle))
        .map(|(needle, issue)| {
            log::debug!("infrastructure signature matched: {needle}");
            *issue
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn crash_signature_detected() {
        let stderr = "2026-08-06 10:00:01 xcodebuild[1]: testmanagerd crashed; retrying";
        assert_eq!(
            detect_infrastructure_issue(stderr),
            Some(InfrastructureIssue::TestManagerCrashed)
        );
    }

    #[test]
    fn lost_connection_is_termination() {
        let stderr = "Error: Lost connection to testmanagerd after 30s";
        let issue = detect_infrastructure_issue(stderr).expect("issue");
        assert_eq!(issue, InfrastructureIssue::TestManagerTerminated);
        assert_eq!(
            issue.warning_line(),
            "Warning: testmanagerd terminated unexpectedly"
        );
    }

    #[test]
    fn runner_daemon_family_has_its_own_phrase() {
        let stderr = "testRunnerd exited due to signal 9";
        let issue = detect_infrastructure_issue(stderr).expect("issue");
        assert_eq!(
            issue.warning_line(),
            "Warning: The test runner daemon crashed"
        );
    }

    #[test]
    fn crash_outranks_lost_connection() {
        let stderr = "Lost connection to testmanagerd\ntestmanagerd crashed";
        assert_eq!(
            detect_infrastructure_issue(stderr),
            Some(InfrastructureIssue::TestManagerCrashed)
        );
    }

    #[test]
    fn clean_stderr_detects_nothing() {
        assert_eq!(detect_infrastructure_issue(""), None);
        assert_eq!(
            detect_infrastructure_issue("Testing started on iPhone 15"),
            None
        );
    }
}
