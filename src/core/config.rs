//! Formatter configuration
//!
//! A `FormatterConfig` is built once, validated, and then shared read-only
//! by every call to the formatter.

use super::error::{FormatterError, Result};
use super::json::JsonValueFormatter;
use super::truncate::MAX_FIELD_BYTES;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key of the build name field appended to every event
pub const ASSEMBLY_NAME_KEY: &str = "assembly.name";
/// Key of the build version field appended to every event
pub const ASSEMBLY_VERSION_KEY: &str = "assembly.version";
/// Property whose members are written as top-level fields
pub const LINKING_METADATA_KEY: &str = "newrelic.linkingmetadata";

/// Identification of the emitting build
///
/// Use the [`build_info!`](crate::build_info) macro to capture the calling
/// crate's package name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub name: String,
    pub version: String,
    /// Additional constant fields, written in order after name and version
    #[serde(default)]
    pub extras: Vec<(String, String)>,
}

impl BuildInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            extras: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.push((key.into(), value.into()));
        self
    }

    /// All metadata fields in output order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (ASSEMBLY_NAME_KEY, self.name.as_str()),
            (ASSEMBLY_VERSION_KEY, self.version.as_str()),
        ]
        .into_iter()
        .chain(self.extras.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Configuration for the structured JSON formatter
///
/// # Examples
///
/// ```
/// use newrelic_log_formatter::core::{BuildInfo, FormatterConfig};
///
/// let config = FormatterConfig::new()
///     .with_build_info(BuildInfo::new("billing-api", "2.4.1"))
///     .with_flatten_depth(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Byte budget for every string field
    pub max_field_bytes: usize,
    /// Maximum property depth expanded into separate fields
    pub flatten_depth: usize,
    /// Member name carrying a structure's type tag; `None` omits tags
    pub type_tag_name: Option<String>,
    /// Write members of the linking metadata property as top-level fields;
    /// off by default, so it flattens like any other property
    pub hoist_linking_metadata: bool,
    pub build_info: BuildInfo,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            max_field_bytes: MAX_FIELD_BYTES,
            flatten_depth: 2,
            type_tag_name: Some("$type".to_string()),
            hoist_linking_metadata: false,
            build_info: BuildInfo::default(),
        }
    }
}

impl FormatterConfig {
    /// Create a new formatter configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_field_bytes(mut self, max_field_bytes: usize) -> Self {
        self.max_field_bytes = max_field_bytes;
        self
    }

    #[must_use]
    pub fn with_flatten_depth(mut self, depth: usize) -> Self {
        self.flatten_depth = depth;
        self
    }

    #[must_use]
    pub fn with_type_tag_name(mut self, name: Option<String>) -> Self {
        self.type_tag_name = name;
        self
    }

    #[must_use]
    pub fn with_hoist_linking_metadata(mut self, hoist: bool) -> Self {
        self.hoist_linking_metadata = hoist;
        self
    }

    #[must_use]
    pub fn with_build_info(mut self, build_info: BuildInfo) -> Self {
        self.build_info = build_info;
        self
    }

    /// Reject settings that would make the output ill-formed or empty
    pub fn validate(&self) -> Result<()> {
        if self.max_field_bytes == 0 {
            return Err(FormatterError::invalid_argument(
                "max_field_bytes",
                "must be greater than zero",
            ));
        }
        if self.flatten_depth == 0 {
            return Err(FormatterError::invalid_argument(
                "flatten_depth",
                "must be at least 1",
            ));
        }
        if let Some(key) = self.build_info.fields().map(|(k, _)| k).find(|k| k.is_empty()) {
            return Err(FormatterError::invalid_argument(
                "build_info",
                format!("metadata key '{}' must not be empty", key),
            ));
        }
        Ok(())
    }

    /// The value renderer described by this configuration
    pub fn value_formatter(&self) -> JsonValueFormatter {
        JsonValueFormatter::new(self.type_tag_name.clone())
    }

    /// Wrap this config in an Arc for sharing across formatters
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
