//! # Xcdiag Heuristics
//!
//! Post-processes extraction output: detects known test-daemon crash
//! signatures in stderr, promotes zero-executed-tests under an explicit
//! filter to a hard failure, and suggests alternative schemes for a test
//! target the current scheme does not declare.
//!
//! A run that fails for any other reason propagates unchanged except for the
//! infrastructure-warning append.

mod error;
mod finalize;
mod infra;
mod scheme;

pub use error::{Result, RunFailure};
pub use finalize::{finalize_build_run, finalize_test_run, TestRunContext};
pub use infra::{detect_infrastructure_issue, InfrastructureIssue};
pub use scheme::{schemes_declaring_target, suggestion_clause};
