//! # Xcdiag Text Output Extractor
//!
//! Line-grammar parser turning raw build/test console text into the
//! structured diagnostic model. Parsing is tolerant by design: unrecognized
//! lines are ignored, never fatal, and the grammar is order-independent
//! except for the multi-line linker block and test-assertion adjacency.

mod extractor;

pub use extractor::extract_build_results;
