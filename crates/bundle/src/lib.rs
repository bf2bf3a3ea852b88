//! # Xcdiag Result Bundle Parser
//!
//! Maps the result-bundle introspection tool's JSON output into the shared
//! diagnostic model. The tool is driven through the [`CommandRunner`] seam so
//! tests can inject canned output; a missing bundle, failing tool, or
//! undecodable document is absence ("could not introspect"), never an error.

mod attachments;
mod runner;
mod xcresult;

pub use attachments::list_test_attachments;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use xcresult::read_result_bundle;
