//! JSON writing primitives
//!
//! `write_quoted_json_string` handles string escaping, `JsonValueFormatter`
//! renders property values, and `JsonObjectWriter` emits the fields of one
//! object in the order they are written, inserting separators itself.

use super::property_value::{PropertyValue, ScalarValue};
use super::timestamp::round_trip;
use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, Serializer};
use std::fmt::Write as _;
use std::io::{self, Write};

/// serde_json output with control characters escaped as `\u0008`, `\u001F`
#[derive(Debug, Clone, Copy, Default)]
struct ControlEscapes;

impl Formatter for ControlEscapes {
    fn write_char_escape<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()> {
        match char_escape {
            CharEscape::Backspace => writer.write_all(b"\\u0008"),
            CharEscape::AsciiControl(byte) => write!(writer, "\\u{:04X}", byte),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

/// Append `text` to `out` as a quoted, escaped JSON string
pub fn write_quoted_json_string(text: &str, out: &mut String) {
    let mut buffer = Vec::with_capacity(text.len() + 2);
    let mut serializer = Serializer::with_formatter(&mut buffer, ControlEscapes);
    // writing a str into memory only fails on allocation
    if text.serialize(&mut serializer).is_ok() {
        out.push_str(&String::from_utf8_lossy(&buffer));
    }
}

/// Quote and escape `text` into a new string
pub fn quote(text: &str) -> String {
    let mut out = String::new();
    write_quoted_json_string(text, &mut out);
    out
}

/// Renders property values as JSON
///
/// Structures carry their type tag as an extra member named after
/// `type_tag_name`, written after the regular members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonValueFormatter {
    type_tag_name: Option<String>,
}

impl Default for JsonValueFormatter {
    fn default() -> Self {
        Self::new(Some("$type".to_string()))
    }
}

impl JsonValueFormatter {
    pub fn new(type_tag_name: Option<String>) -> Self {
        Self { type_tag_name }
    }

    pub fn type_tag_name(&self) -> Option<&str> {
        self.type_tag_name.as_deref()
    }

    /// Render `value` as JSON text
    pub fn format(&self, value: &PropertyValue) -> String {
        let mut out = String::new();
        self.write_value(value, &mut out);
        out
    }

    pub fn write_value(&self, value: &PropertyValue, out: &mut String) {
        match value {
            PropertyValue::Scalar(scalar) => self.write_scalar(scalar, out),
            PropertyValue::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_value(item, out);
                }
                out.push(']');
            }
            PropertyValue::Structure(structure) => {
                out.push('{');
                let mut delim = "";
                for (name, member) in &structure.properties {
                    out.push_str(delim);
                    delim = ",";
                    write_quoted_json_string(name, out);
                    out.push(':');
                    self.write_value(member, out);
                }
                if let (Some(tag_name), Some(tag)) = (&self.type_tag_name, &structure.type_tag) {
                    out.push_str(delim);
                    write_quoted_json_string(tag_name, out);
                    out.push(':');
                    write_quoted_json_string(tag, out);
                }
                out.push('}');
            }
            PropertyValue::Dictionary(entries) => {
                out.push('{');
                for (i, (key, member)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_quoted_json_string(&key.to_key_string(), out);
                    out.push(':');
                    self.write_value(member, out);
                }
                out.push('}');
            }
            PropertyValue::Opaque(text) => write_quoted_json_string(text, out),
        }
    }

    pub fn write_scalar(&self, scalar: &ScalarValue, out: &mut String) {
        match scalar {
            ScalarValue::Null => out.push_str("null"),
            ScalarValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            ScalarValue::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            ScalarValue::UInt(u) => {
                let _ = write!(out, "{}", u);
            }
            ScalarValue::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(number) => {
                    let _ = write!(out, "{}", number);
                }
                // NaN and infinities have no JSON number form
                None if f.is_nan() => out.push_str("\"NaN\""),
                None if *f > 0.0 => out.push_str("\"Infinity\""),
                None => out.push_str("\"-Infinity\""),
            },
            ScalarValue::Char(c) => write_quoted_json_string(c.encode_utf8(&mut [0; 4]), out),
            ScalarValue::String(s) => write_quoted_json_string(s, out),
            ScalarValue::Timestamp(at) => write_quoted_json_string(&round_trip(at), out),
        }
    }
}

/// Writes the fields of a single JSON object to a sink
///
/// The separator goes before every field but the first, so the object can
/// never end in a trailing comma however many fields are written.
pub struct JsonObjectWriter<'w, W: Write + ?Sized> {
    sink: &'w mut W,
    fields: usize,
}

impl<'w, W: Write + ?Sized> JsonObjectWriter<'w, W> {
    /// Write the opening brace
    pub fn begin(sink: &'w mut W) -> io::Result<Self> {
        sink.write_all(b"{")?;
        Ok(Self { sink, fields: 0 })
    }

    /// Write a field whose value is already valid JSON text
    pub fn raw_field(&mut self, key: &str, json_value: &str) -> io::Result<()> {
        let mut prefix = String::with_capacity(key.len() + 4);
        if self.fields > 0 {
            prefix.push(',');
        }
        write_quoted_json_string(key, &mut prefix);
        prefix.push(':');
        self.sink.write_all(prefix.as_bytes())?;
        self.sink.write_all(json_value.as_bytes())?;
        self.fields += 1;
        Ok(())
    }

    /// Write a field with a string value, escaping it
    pub fn string_field(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.raw_field(key, &quote(value))
    }

    /// Write a field whose value is an array of strings
    pub fn string_array_field<'a, I>(&mut self, key: &str, values: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut array = String::from("[");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                array.push(',');
            }
            write_quoted_json_string(value, &mut array);
        }
        array.push(']');
        self.raw_field(key, &array)
    }

    pub fn field_count(&self) -> usize {
        self.fields
    }

    /// Write the closing brace and the line terminator
    pub fn end_line(self) -> io::Result<()> {
        self.sink.write_all(b"}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StructureValue;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("line\nnext\ttab"), "\"line\\nnext\\ttab\"");
        assert_eq!(quote("\u{01}"), "\"\\u0001\"");
        assert_eq!(quote("\u{08}\u{0c}"), "\"\\u0008\\f\"");
        assert_eq!(quote("\u{1f}"), "\"\\u001F\"");
        assert_eq!(quote("ünï✓"), "\"ünï✓\"");
    }

    #[test]
    fn test_quote_output_parses() {
        let nasty = "\"\\\u{0}\u{1f}\r\n\u{08}\u{0c}/end";
        let parsed: String = serde_json::from_str(&quote(nasty)).unwrap();
        assert_eq!(parsed, nasty);
    }

    #[test]
    fn test_scalar_json() {
        let formatter = JsonValueFormatter::default();
        assert_eq!(formatter.format(&42.into()), "42");
        assert_eq!(formatter.format(&1.5.into()), "1.5");
        assert_eq!(formatter.format(&true.into()), "true");
        assert_eq!(formatter.format(&"x".into()), "\"x\"");
        assert_eq!(formatter.format(&f64::NAN.into()), "\"NaN\"");
        assert_eq!(formatter.format(&f64::NEG_INFINITY.into()), "\"-Infinity\"");
        assert_eq!(formatter.format(&PropertyValue::opaque("Id(3)")), "\"Id(3)\"");
    }

    #[test]
    fn test_structure_type_tag_written_last() {
        let value: PropertyValue = StructureValue::tagged("Order")
            .with_property("Id", 7)
            .into();

        assert_eq!(
            JsonValueFormatter::default().format(&value),
            r#"{"Id":7,"$type":"Order"}"#
        );
        assert_eq!(JsonValueFormatter::new(None).format(&value), r#"{"Id":7}"#);
    }

    #[test]
    fn test_dictionary_and_sequence() {
        let value = PropertyValue::Dictionary(vec![
            (ScalarValue::Int(1), vec!["a", "b"].into()),
            (ScalarValue::String("k".to_string()), PropertyValue::Scalar(ScalarValue::Null)),
        ]);
        let json = JsonValueFormatter::default().format(&value);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["1"], serde_json::json!(["a", "b"]));
        assert!(parsed["k"].is_null());
    }

    #[test]
    fn test_object_writer_separators() {
        let mut sink = Vec::new();
        let mut writer = JsonObjectWriter::begin(&mut sink).unwrap();
        writer.string_field("a", "1").unwrap();
        writer.raw_field("b", "2").unwrap();
        writer.string_array_field("c", ["x", "y"]).unwrap();
        writer.end_line().unwrap();

        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "{\"a\":\"1\",\"b\":2,\"c\":[\"x\",\"y\"]}\n"
        );
    }

    #[test]
    fn test_object_writer_empty_object() {
        let mut sink = Vec::new();
        let writer = JsonObjectWriter::begin(&mut sink).unwrap();
        assert_eq!(writer.field_count(), 0);
        writer.end_line().unwrap();
        assert_eq!(sink, b"{}\n");
    }
}
