//! # Xcdiag Diagnostic Model
//!
//! Shared structured types for build/test/crash diagnostics, plus the
//! fixed-format text renderers other systems pattern-match against.
//!
//! Every value here is constructed once per parse call and never mutated;
//! "updates" produce a new value. There is no cross-call cache anywhere in
//! the model — each parse is a pure function of its input.

mod attachment;
mod build;
mod crash;
mod preview;
mod render;

pub use attachment::TestAttachment;
pub use build::{
    BuildError, BuildExtras, BuildResult, BuildStatus, BuildSummary, BuildWarning, CodeCoverage,
    FailedTest, FileCoverage, LinkerError,
};
pub use crash::CrashSummary;
pub use preview::PreviewBlock;
pub use render::{format_build_report, format_test_report, pluralize};
