//! Appender implementations

pub mod json_lines;

pub use json_lines::{JsonLinesAppender, SharedSink};

// Re-export trait for convenience
pub use crate::core::Appender;
