use serde::{Deserialize, Serialize};

/// A named code block extracted from source text.
///
/// Blocks are reported in source order; each scan is independent and
/// stateless across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewBlock {
    /// Display name from the marker's quoted argument, when present
    pub name: Option<String>,

    /// Trimmed body of the `{ … }` block
    pub body: String,
}
