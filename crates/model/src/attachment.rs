use serde::{Deserialize, Serialize};

/// One attachment exported from a result bundle's test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAttachment {
    /// Identifier of the test the attachment belongs to, when recorded
    pub test_identifier: Option<String>,

    /// File name the attachment was exported under
    pub exported_file_name: String,

    /// Human-readable attachment name
    pub display_name: String,

    /// Whether the attachment was captured for a failing test
    pub is_associated_with_failure: bool,

    /// Capture timestamp (seconds since epoch), when recorded
    pub timestamp: Option<f64>,
}
