//! # Xcdiag Crash Report Parser
//!
//! Projects loosely-typed crash-report JSON into [`xcdiag_model::CrashSummary`],
//! searches the platform's diagnostic-reports directories for recent reports,
//! and classifies debugger console transcripts as crash/no-crash.
//!
//! Every key lookup yields an optional; absence never raises an error.

mod debugger;
mod report;
mod search;

pub use debugger::transcript_indicates_crash;
pub use report::parse_crash_report;
pub use search::{find_recent_reports, find_recent_reports_in, CrashReportEntry};
