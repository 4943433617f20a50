//! # New Relic Log Formatter
//!
//! Renders structured log events as newline-delimited JSON in the layout
//! accepted by New Relic log ingestion.
//!
//! ## Features
//!
//! - **Fixed field order**: `@t`, `@mt`, `@r`, `@l`, `level`, `message`, `@x`,
//!   properties, build metadata
//! - **Message templates**: placeholders with formats, alignment and capture hints
//! - **Bounded fields**: string content cut to 32 KiB on UTF-8 boundaries
//! - **Property flattening**: nested values expanded to `parent.member` keys

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::JsonLinesAppender;
    pub use crate::core::{
        Appender, BuildInfo, EventException, FormatStats, FormatterConfig, FormatterError,
        FormatterMetrics, LogEvent, LogLevel, MessageTemplate, PropertyValue, Result,
        ScalarValue, StructureValue, StructuredJsonFormatter,
    };
}

pub use appenders::JsonLinesAppender;
pub use core::{
    Appender, BuildInfo, EventException, FormatStats, FormatterConfig, FormatterError,
    FormatterMetrics, LogEvent, LogLevel, MessageTemplate, PropertyValue, Result, ScalarValue,
    StructureValue, StructuredJsonFormatter,
};
