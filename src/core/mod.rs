//! Core formatter types

pub mod appender;
pub mod config;
pub mod error;
pub mod exception;
pub mod formatter;
pub mod json;
pub mod log_event;
pub mod log_level;
pub mod message_template;
pub mod metrics;
pub mod property_value;
pub mod timestamp;
pub mod truncate;

pub use appender::Appender;
pub use config::{BuildInfo, FormatterConfig, LINKING_METADATA_KEY};
pub use error::{FormatterError, Result};
pub use exception::EventException;
pub use formatter::{FormatStats, StructuredJsonFormatter};
pub use json::{write_quoted_json_string, JsonObjectWriter, JsonValueFormatter};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use message_template::{
    Alignment, AlignmentDirection, Destructuring, MessageTemplate, PropertyToken, TemplateToken,
};
pub use metrics::FormatterMetrics;
pub use property_value::{Properties, PropertyValue, ScalarValue, StructureValue};
pub use timestamp::TimestampFormat;
pub use truncate::{truncate_to_bytes, MAX_FIELD_BYTES};
