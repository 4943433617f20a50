//! Structured JSON formatter
//!
//! Renders one [`LogEvent`] as one line of JSON in the layout expected by the
//! New Relic log ingestion endpoint:
//!
//! ```text
//! {"@t":"2022-11-02T06:30:10.5368801Z","@mt":"User {UserId} logged in","@l":"Warning",
//!  "level":"Warning","message":"User 42 logged in","UserId":42,
//!  "assembly.name":"billing-api","assembly.version":"2.4.1"}
//! ```
//!
//! Field order is fixed: `@t`, `@mt`, `@r` (only when a placeholder has a
//! format), `@l`, `level`, `message`, `@x` (only with an exception), the
//! flattened properties, then the build metadata.

use super::config::{FormatterConfig, LINKING_METADATA_KEY};
use super::error::Result;
use super::json::{quote, JsonObjectWriter, JsonValueFormatter};
use super::log_event::LogEvent;
use super::property_value::{Properties, PropertyValue, ScalarValue};
use super::timestamp::round_trip;
use super::truncate::truncate_to_bytes;
use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;

/// Counters describing a single formatted event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatStats {
    /// Property fields written, metadata excluded
    pub property_fields: usize,
    /// String fields cut to the byte budget
    pub truncated_fields: usize,
}

/// Formats log events as newline-delimited New Relic JSON
///
/// The formatter keeps only its immutable configuration, so one instance can
/// be shared across threads, each formatting into its own sink.
///
/// # Example
///
/// ```
/// use newrelic_log_formatter::prelude::*;
///
/// let formatter = StructuredJsonFormatter::default();
/// let event = LogEvent::new(LogLevel::Warning, "User {UserId} logged in")
///     .with_property("UserId", 42);
///
/// let mut line = Vec::new();
/// formatter.format(&event, &mut line).unwrap();
///
/// let json: serde_json::Value = serde_json::from_slice(&line).unwrap();
/// assert_eq!(json["message"], "User 42 logged in");
/// assert_eq!(json["UserId"], 42);
/// ```
#[derive(Debug, Clone)]
pub struct StructuredJsonFormatter {
    config: Arc<FormatterConfig>,
    value_formatter: JsonValueFormatter,
}

impl Default for StructuredJsonFormatter {
    fn default() -> Self {
        let config = FormatterConfig::default();
        Self {
            value_formatter: config.value_formatter(),
            config: Arc::new(config),
        }
    }
}

impl StructuredJsonFormatter {
    /// Create a formatter, validating the configuration first
    pub fn new(config: impl Into<Arc<FormatterConfig>>) -> Result<Self> {
        let config = config.into();
        config.validate()?;
        Ok(Self {
            value_formatter: config.value_formatter(),
            config,
        })
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Write `event` to `sink` as one JSON object followed by a newline
    ///
    /// Sink errors are returned as soon as they occur; whatever was written
    /// before the failure stays in the sink and should be discarded.
    pub fn format<W: Write + ?Sized>(&self, event: &LogEvent, sink: &mut W) -> Result<()> {
        self.format_with_stats(event, sink).map(|_| ())
    }

    /// Like [`format`](Self::format), also reporting what was written
    pub fn format_with_stats<W: Write + ?Sized>(
        &self,
        event: &LogEvent,
        sink: &mut W,
    ) -> Result<FormatStats> {
        let mut stats = FormatStats::default();
        let properties = event.properties();
        let mut object = JsonObjectWriter::begin(sink)?;

        object.string_field("@t", &round_trip(event.timestamp()))?;

        let template = self.truncate(event.template().text(), &mut stats);
        object.string_field("@mt", &template)?;

        let referred = referred_properties(event);
        if !referred.is_empty() {
            object.string_array_field("@r", referred.iter().map(String::as_str))?;
        }

        let label = event.level().to_str();
        object.string_field("@l", label)?;
        object.string_field("level", label)?;

        let rendered = event.render_message();
        let message = self.truncate(&rendered, &mut stats);
        object.string_field("message", &message)?;

        if let Some(exception) = event.exception() {
            object.string_field("@x", &exception.to_string())?;
        }

        for (key, value) in self.flatten(properties) {
            let json = self.property_json(value, &mut stats);
            object.raw_field(&escape_reserved_key(&key), &json)?;
            stats.property_fields += 1;
        }

        for (key, value) in self.config.build_info.fields() {
            object.string_field(key, value)?;
        }

        object.end_line()?;
        Ok(stats)
    }

    /// Format into a new string, newline included
    pub fn format_to_string(&self, event: &LogEvent) -> Result<String> {
        let mut buffer = Vec::with_capacity(256);
        self.format(event, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn truncate<'a>(&self, text: &'a str, stats: &mut FormatStats) -> Cow<'a, str> {
        let truncated = truncate_to_bytes(text, self.config.max_field_bytes);
        if matches!(truncated, Cow::Owned(_)) {
            stats.truncated_fields += 1;
        }
        truncated
    }

    /// JSON text for one flattened property value
    ///
    /// Strings are cut before quoting. Composite values whose JSON exceeds
    /// the budget are written as a string holding the cut JSON text.
    fn property_json(&self, value: &PropertyValue, stats: &mut FormatStats) -> String {
        match value {
            PropertyValue::Scalar(ScalarValue::String(text)) | PropertyValue::Opaque(text) => {
                quote(&self.truncate(text, stats))
            }
            other => {
                let json = self.value_formatter.format(other);
                if json.len() > self.config.max_field_bytes {
                    quote(&self.truncate(&json, stats))
                } else {
                    json
                }
            }
        }
    }

    /// Expand properties into `(key, value)` fields up to the configured depth
    fn flatten<'e>(&self, properties: &'e Properties) -> Vec<(String, &'e PropertyValue)> {
        let mut fields = Vec::with_capacity(properties.len());
        for (name, value) in properties {
            if self.config.hoist_linking_metadata
                && name == LINKING_METADATA_KEY
                && has_members(value)
            {
                for (member_name, member) in members(value) {
                    self.flatten_into(member_name, member, 1, &mut fields);
                }
            } else {
                self.flatten_into(name.clone(), value, 1, &mut fields);
            }
        }
        fields
    }

    fn flatten_into<'e>(
        &self,
        key: String,
        value: &'e PropertyValue,
        depth: usize,
        fields: &mut Vec<(String, &'e PropertyValue)>,
    ) {
        if depth < self.config.flatten_depth && has_members(value) {
            for (member_name, member) in members(value) {
                self.flatten_into(format!("{}.{}", key, member_name), member, depth + 1, fields);
            }
        } else {
            fields.push((key, value));
        }
    }
}

/// Each placeholder carrying a format, rendered on its own
fn referred_properties(event: &LogEvent) -> Vec<String> {
    event
        .template()
        .property_tokens()
        .filter(|token| token.format().is_some())
        .map(|token| {
            let mut rendered = String::new();
            token.render(event.properties(), &mut rendered);
            rendered
        })
        .collect()
}

/// Keys starting with `@` get a second `@` so they cannot shadow `@t`, `@x`, ...
fn escape_reserved_key(key: &str) -> Cow<'_, str> {
    if key.starts_with('@') {
        Cow::Owned(format!("@{}", key))
    } else {
        Cow::Borrowed(key)
    }
}

fn has_members(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Structure(structure) => !structure.properties.is_empty(),
        PropertyValue::Dictionary(entries) => !entries.is_empty(),
        _ => false,
    }
}

fn members(value: &PropertyValue) -> Vec<(String, &PropertyValue)> {
    match value {
        PropertyValue::Structure(structure) => structure
            .properties
            .iter()
            .map(|(name, member)| (name.clone(), member))
            .collect(),
        PropertyValue::Dictionary(entries) => entries
            .iter()
            .map(|(key, member)| (key.to_key_string(), member))
            .collect(),
        _ => Vec::new(),
    }
}
