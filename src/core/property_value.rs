//! Property values attached to log events
//!
//! Values come in five shapes: scalars, sequences, structures (named members
//! with an optional type tag), dictionaries (scalar-keyed mappings) and opaque
//! objects that are only known by their text. Two renderings exist: the
//! textual one used inside rendered messages (this module) and the JSON one
//! used for property fields (`core::json`).

use super::error::Result;
use super::timestamp::{round_trip, TimestampFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// Event properties keyed by name, iterated in key order
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single atomic value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
    Timestamp(DateTime<Utc>),
}

/// Named members with an optional type tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureValue {
    pub type_tag: Option<String>,
    pub properties: Vec<(String, PropertyValue)>,
}

impl StructureValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tagged(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            properties: Vec::new(),
        }
    }

    /// Append a member
    pub fn with_property<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    Sequence(Vec<PropertyValue>),
    Structure(StructureValue),
    Dictionary(Vec<(ScalarValue, PropertyValue)>),
    /// An object only known by its textual representation
    Opaque(String),
}

impl PropertyValue {
    /// Capture any serializable value by destructuring it into a property value
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Capture a value by its `Display` text
    pub fn opaque(value: impl fmt::Display) -> Self {
        PropertyValue::Opaque(value.to_string())
    }

    /// Render the value as it appears inside a rendered message
    pub fn render(&self, format: Option<&str>, out: &mut String) {
        match self {
            PropertyValue::Scalar(scalar) => scalar.render(format, out),
            PropertyValue::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render(format, out);
                }
                out.push(']');
            }
            PropertyValue::Structure(structure) => {
                if let Some(tag) = &structure.type_tag {
                    out.push_str(tag);
                    out.push(' ');
                }
                out.push_str("{ ");
                for (i, (name, value)) in structure.properties.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    value.render(format, out);
                }
                out.push_str(" }");
            }
            PropertyValue::Dictionary(entries) => {
                out.push('[');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('(');
                    key.render(None, out);
                    out.push_str(": ");
                    value.render(format, out);
                    out.push(')');
                }
                out.push(']');
            }
            PropertyValue::Opaque(text) => out.push_str(text),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(None, &mut out);
        f.write_str(&out)
    }
}

impl ScalarValue {
    /// Plain text of the value, used for dictionary keys and flattened names
    pub fn to_key_string(&self) -> String {
        match self {
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Char(c) => c.to_string(),
            other => {
                let mut out = String::new();
                other.render(Some("l"), &mut out);
                out
            }
        }
    }

    /// Render the scalar as it appears inside a rendered message
    ///
    /// Strings are quoted unless the `l` (literal) format is given. Numbers
    /// accept `N`, `F`, `D`, `X`, `E` and `P` specifiers with an optional
    /// precision; timestamps accept `O`, `u`, `s` or a strftime pattern.
    pub fn render(&self, format: Option<&str>, out: &mut String) {
        match self {
            ScalarValue::Null => out.push_str("null"),
            ScalarValue::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            ScalarValue::Int(i) => match format.and_then(|f| format_integer(*i as i128, f)) {
                Some(text) => out.push_str(&text),
                None => {
                    let _ = write!(out, "{}", i);
                }
            },
            ScalarValue::UInt(u) => match format.and_then(|f| format_integer(*u as i128, f)) {
                Some(text) => out.push_str(&text),
                None => {
                    let _ = write!(out, "{}", u);
                }
            },
            ScalarValue::Float(v) => match format.and_then(|f| format_float(*v, f)) {
                Some(text) => out.push_str(&text),
                None => {
                    let _ = write!(out, "{}", v);
                }
            },
            ScalarValue::Char(c) => {
                if format == Some("l") {
                    out.push(*c);
                } else {
                    out.push('\'');
                    out.push(*c);
                    out.push('\'');
                }
            }
            ScalarValue::String(s) => {
                if format == Some("l") {
                    out.push_str(s);
                } else {
                    out.push('"');
                    out.push_str(&s.replace('"', "\\\""));
                    out.push('"');
                }
            }
            ScalarValue::Timestamp(at) => match format.and_then(TimestampFormat::from_spec) {
                Some(timestamp_format) => out.push_str(&timestamp_format.format(at)),
                None => out.push_str(&round_trip(at)),
            },
        }
    }
}

/// Largest precision a numeric specifier may carry
const MAX_PRECISION: usize = 99;

/// Split a numeric specifier such as `N2` into its letter and precision
///
/// Precisions above [`MAX_PRECISION`] are rejected, so the value falls back
/// to its default rendering.
fn parse_numeric_spec(spec: &str) -> Option<(char, Option<usize>)> {
    let mut chars = spec.chars();
    let letter = chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some((letter, None));
    }
    rest.parse::<usize>()
        .ok()
        .filter(|p| *p <= MAX_PRECISION)
        .map(|p| (letter, Some(p)))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn with_sign(negative: bool, body: String) -> String {
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn format_integer(value: i128, spec: &str) -> Option<String> {
    let (letter, precision) = parse_numeric_spec(spec)?;
    let negative = value < 0;
    let magnitude = value.unsigned_abs();
    match letter {
        'D' | 'd' => {
            let width = precision.unwrap_or(0);
            Some(with_sign(negative, format!("{:0width$}", magnitude, width = width)))
        }
        'X' | 'x' => {
            // two's complement of the 64-bit source value
            let bits = if negative { value as i64 as u64 } else { value as u64 };
            let width = precision.unwrap_or(0);
            Some(if letter == 'X' {
                format!("{:0width$X}", bits, width = width)
            } else {
                format!("{:0width$x}", bits, width = width)
            })
        }
        'N' | 'n' | 'F' | 'f' => {
            let decimals = precision.unwrap_or(2);
            let mut body = magnitude.to_string();
            if matches!(letter, 'N' | 'n') {
                body = group_thousands(&body);
            }
            if decimals > 0 {
                body.push('.');
                body.push_str(&"0".repeat(decimals));
            }
            Some(with_sign(negative, body))
        }
        'E' | 'e' | 'P' | 'p' => format_float(value as f64, spec),
        _ => None,
    }
}

fn format_float(value: f64, spec: &str) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let (letter, precision) = parse_numeric_spec(spec)?;
    match letter {
        'N' | 'n' | 'F' | 'f' => {
            let decimals = precision.unwrap_or(2);
            let fixed = format!("{:.*}", decimals, value.abs());
            let body = if matches!(letter, 'N' | 'n') {
                match fixed.split_once('.') {
                    Some((int_part, frac)) => format!("{}.{}", group_thousands(int_part), frac),
                    None => group_thousands(&fixed),
                }
            } else {
                fixed
            };
            let negative = value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
            Some(with_sign(negative, body))
        }
        'E' | 'e' => {
            let decimals = precision.unwrap_or(6);
            let scientific = format!("{:.*e}", decimals, value);
            let (mantissa, exponent) = scientific.split_once('e')?;
            let exponent: i32 = exponent.parse().ok()?;
            let sign = if exponent < 0 { '-' } else { '+' };
            Some(format!(
                "{}{}{}{:03}",
                mantissa,
                letter,
                sign,
                exponent.unsigned_abs()
            ))
        }
        'P' | 'p' => {
            let decimals = precision.unwrap_or(2);
            Some(format!("{:.*}%", decimals, value * 100.0))
        }
        _ => None,
    }
}

impl From<ScalarValue> for PropertyValue {
    fn from(value: ScalarValue) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<StructureValue> for PropertyValue {
    fn from(value: StructureValue) -> Self {
        PropertyValue::Structure(value)
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Scalar(ScalarValue::String(s))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Scalar(ScalarValue::String(s.to_string()))
    }
}

impl From<char> for PropertyValue {
    fn from(c: char) -> Self {
        PropertyValue::Scalar(ScalarValue::Char(c))
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Scalar(ScalarValue::Int(i))
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Scalar(ScalarValue::Int(i as i64))
    }
}

impl From<u64> for PropertyValue {
    fn from(u: u64) -> Self {
        PropertyValue::Scalar(ScalarValue::UInt(u))
    }
}

impl From<u32> for PropertyValue {
    fn from(u: u32) -> Self {
        PropertyValue::Scalar(ScalarValue::UInt(u as u64))
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Scalar(ScalarValue::Float(f))
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Scalar(ScalarValue::Bool(b))
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(at: DateTime<Utc>) -> Self {
        PropertyValue::Scalar(ScalarValue::Timestamp(at))
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Scalar(ScalarValue::Null), Into::into)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Scalar(ScalarValue::Null),
            serde_json::Value::Bool(b) => b.into(),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.into()
                } else if let Some(u) = n.as_u64() {
                    u.into()
                } else {
                    n.as_f64().unwrap_or(f64::NAN).into()
                }
            }
            serde_json::Value::String(s) => s.into(),
            serde_json::Value::Array(items) => {
                PropertyValue::Sequence(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => PropertyValue::Structure(StructureValue {
                type_tag: None,
                properties: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            }),
        }
    }
}
