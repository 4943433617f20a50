//! Log event structure

use super::exception::EventException;
use super::log_level::LogLevel;
use super::message_template::MessageTemplate;
use super::property_value::{Properties, PropertyValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully formed log event, read by the formatter
///
/// # Example
///
/// ```
/// use newrelic_log_formatter::prelude::*;
///
/// let event = LogEvent::new(LogLevel::Warning, "User {UserId} logged in")
///     .with_property("UserId", 42);
///
/// assert_eq!(event.render_message(), "User 42 logged in");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    template: MessageTemplate,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<EventException>,
    properties: Properties,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(level: LogLevel, template: impl Into<MessageTemplate>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            template: template.into(),
            exception: None,
            properties: Properties::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a property; an existing property with the same name is replaced
    pub fn with_property<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_exception(mut self, exception: impl Into<EventException>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn template(&self) -> &MessageTemplate {
        &self.template
    }

    pub fn exception(&self) -> Option<&EventException> {
        self.exception.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The template with every placeholder substituted
    pub fn render_message(&self) -> String {
        self.template.render(&self.properties)
    }
}
