use serde::{Deserialize, Serialize};

/// Structured summary of one crash report.
///
/// Every field is optional; crash-report JSON is loosely typed and any key
/// may be absent. An all-absent summary formats to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashSummary {
    /// Crashed process name (`procName`)
    pub process_name: Option<String>,

    /// Bundle identifier (`bundleInfo.CFBundleIdentifier`)
    pub bundle_id: Option<String>,

    /// Mach exception type (e.g. `EXC_BAD_ACCESS`)
    pub exception_type: Option<String>,

    /// POSIX signal name (e.g. `SIGSEGV`)
    pub signal: Option<String>,

    /// Termination namespace (e.g. `DYLD`, `SIGNAL`)
    pub termination_namespace: Option<String>,

    /// Termination indicator code within the namespace
    pub termination_indicator: Option<String>,

    /// Termination reason strings, report order preserved
    #[serde(default)]
    pub termination_reasons: Vec<String>,

    /// Termination detail strings, report order preserved
    #[serde(default)]
    pub termination_details: Vec<String>,

    /// Whether the report flags a launch-time dynamic-linker failure
    #[serde(default)]
    pub is_fatal_dyld_error: bool,
}

impl CrashSummary {
    /// Whether no field of the summary is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.process_name.is_none()
            && self.bundle_id.is_none()
            && self.exception_type.is_none()
            && self.signal.is_none()
            && self.termination_namespace.is_none()
            && self.termination_indicator.is_none()
            && self.termination_reasons.is_empty()
            && self.termination_details.is_empty()
            && !self.is_fatal_dyld_error
    }

    /// Render the summary as a multi-line report, one line per present field.
    ///
    /// The dyld hint line appears only when the flag is set and the
    /// termination namespace is not already `DYLD`, so the condition is never
    /// signaled twice.
    #[must_use]
    pub fn formatted(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(process) = &self.process_name {
            lines.push(format!("Process: {process}"));
        }
        if let Some(exception) = &self.exception_type {
            lines.push(format!("Exception Type: {exception}"));
        }
        if let Some(signal) = &self.signal {
            lines.push(format!("Signal: {signal}"));
        }
        match (&self.termination_namespace, &self.termination_indicator) {
            (Some(namespace), Some(indicator)) => {
                lines.push(format!("Termination: {namespace} — {indicator}"));
            }
            (Some(namespace), None) => lines.push(format!("Termination: {namespace}")),
            (None, Some(indicator)) => lines.push(format!("Termination: {indicator}")),
            (None, None) => {}
        }
        for reason in &self.termination_reasons {
            lines.push(format!("Reason: {reason}"));
        }
        for detail in &self.termination_details {
            lines.push(format!("Detail: {detail}"));
        }

        let namespace_is_dyld = self
            .termination_namespace
            .as_deref()
            .is_some_and(|ns| ns == "DYLD");
        if self.is_fatal_dyld_error && !namespace_is_dyld {
            lines.push("Fatal dyld error: the process failed during dynamic linking".to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_summary_formats_to_empty_string() {
        assert_eq!(CrashSummary::default().formatted(), "");
        assert!(CrashSummary::default().is_empty());
    }

    #[test]
    fn process_only_summary_is_one_line() {
        let summary = CrashSummary {
            process_name: Some("X".to_string()),
            ..CrashSummary::default()
        };
        assert_eq!(summary.formatted(), "Process: X");
    }

    #[test]
    fn dyld_hint_emitted_without_dyld_namespace() {
        let summary = CrashSummary {
            is_fatal_dyld_error: true,
            ..CrashSummary::default()
        };
        assert!(summary.formatted().contains("Fatal dyld error"));
    }

    #[test]
    fn dyld_namespace_suppresses_hint() {
        let summary = CrashSummary {
            termination_namespace: Some("DYLD".to_string()),
            termination_indicator: Some("1".to_string()),
            is_fatal_dyld_error: true,
            ..CrashSummary::default()
        };
        let formatted = summary.formatted();
        assert!(formatted.contains("DYLD — 1"));
        assert!(!formatted.contains("Fatal dyld error"));
    }

    #[test]
    fn reasons_and_details_keep_report_order() {
        let summary = CrashSummary {
            termination_reasons: vec!["first".to_string(), "second".to_string()],
            termination_details: vec!["detail".to_string()],
            ..CrashSummary::default()
        };
        assert_eq!(
            summary.formatted(),
            "Reason: first\nReason: second\nDetail: detail"
        );
    }
}
