//! # Xcdiag Preview Block Extractor
//!
//! Extracts `#Preview`-marked `{ … }` blocks from source text. Implemented
//! as an explicit character-level state machine rather than a regex: brace
//! depth must ignore braces inside string literals, multi-line string
//! literals, line comments, and (nested) block comments, and none of that
//! nesting is expressible in a single regular expression.
//!
//! Stateless and restartable: each scan is independent, and repeated calls
//! over overlapping ranges of the same document are safe.

mod scanner;

pub use scanner::{extract_marked_blocks, extract_preview_blocks};
