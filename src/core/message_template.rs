//! Message templates
//!
//! A template such as `"Processed {Count:N0} items for {@User}"` is parsed
//! once into literal text and property tokens. Rendering substitutes the
//! event's property values into the placeholders.

use super::property_value::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a placeholder asked for its value to be captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destructuring {
    #[default]
    Default,
    /// `{@Name}`: capture the structure of the value
    Destructure,
    /// `{$Name}`: capture the value's text
    Stringify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentDirection {
    Left,
    Right,
}

/// Padding applied to a rendered placeholder, e.g. `{Name,-10}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub direction: AlignmentDirection,
    pub width: usize,
}

impl Alignment {
    fn parse(text: &str) -> Option<Self> {
        let (direction, digits) = match text.strip_prefix('-') {
            Some(rest) => (AlignmentDirection::Left, rest),
            None => (AlignmentDirection::Right, text),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let width = digits.parse().ok()?;
        Some(Self { direction, width })
    }

    fn apply(&self, rendered: &str, out: &mut String) {
        let len = rendered.chars().count();
        let padding = self.width.saturating_sub(len);
        match self.direction {
            AlignmentDirection::Right => {
                out.extend(std::iter::repeat(' ').take(padding));
                out.push_str(rendered);
            }
            AlignmentDirection::Left => {
                out.push_str(rendered);
                out.extend(std::iter::repeat(' ').take(padding));
            }
        }
    }
}

/// A placeholder within a message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyToken {
    name: String,
    format: Option<String>,
    alignment: Option<Alignment>,
    destructuring: Destructuring,
    raw_text: String,
}

impl PropertyToken {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Custom render format, e.g. `N2` in `{Total:N2}`
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn destructuring(&self) -> Destructuring {
        self.destructuring
    }

    /// The placeholder exactly as written, braces included
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Render this placeholder alone against the given properties
    ///
    /// A placeholder without a matching property renders as its raw text.
    pub fn render(&self, properties: &Properties, out: &mut String) {
        let Some(value) = properties.get(&self.name) else {
            out.push_str(&self.raw_text);
            return;
        };

        match self.alignment {
            Some(alignment) => {
                let mut rendered = String::new();
                value.render(self.format(), &mut rendered);
                alignment.apply(&rendered, out);
            }
            None => value.render(self.format(), out),
        }
    }

    /// Parse the inside of `{...}`; `None` means the braces are literal text
    fn parse(inner: &str, raw_text: &str) -> Option<Self> {
        let (destructuring, rest) = match inner.chars().next()? {
            '@' => (Destructuring::Destructure, &inner[1..]),
            '$' => (Destructuring::Stringify, &inner[1..]),
            _ => (Destructuring::Default, inner),
        };

        let (head, format) = match rest.split_once(':') {
            Some((head, format)) => (head, Some(format)),
            None => (rest, None),
        };
        let (name, alignment) = match head.split_once(',') {
            Some((name, alignment)) => (name, Some(Alignment::parse(alignment)?)),
            None => (head, None),
        };

        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        if let Some(format) = format {
            if format.is_empty() || format.contains('{') {
                return None;
            }
        }

        Some(Self {
            name: name.to_string(),
            format: format.map(str::to_string),
            alignment,
            destructuring,
            raw_text: raw_text.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateToken {
    Text(String),
    Property(PropertyToken),
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    text: String,
    tokens: Vec<TemplateToken>,
}

impl MessageTemplate {
    /// Parse template text into tokens
    ///
    /// `{{` and `}}` are escaped braces. Malformed placeholders are kept as
    /// literal text rather than rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use newrelic_log_formatter::core::MessageTemplate;
    ///
    /// let template = MessageTemplate::parse("User {UserId} took {Elapsed:N2} ms");
    /// let names: Vec<_> = template.property_tokens().map(|t| t.name()).collect();
    /// assert_eq!(names, ["UserId", "Elapsed"]);
    /// ```
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    /// The template text exactly as written
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    pub fn property_tokens(&self) -> impl Iterator<Item = &PropertyToken> {
        self.tokens.iter().filter_map(|token| match token {
            TemplateToken::Property(property) => Some(property),
            TemplateToken::Text(_) => None,
        })
    }

    /// Substitute property values into every placeholder
    pub fn render(&self, properties: &Properties) -> String {
        let mut out = String::with_capacity(self.text.len());
        for token in &self.tokens {
            match token {
                TemplateToken::Text(text) => out.push_str(text),
                TemplateToken::Property(property) => property.render(properties, &mut out),
            }
        }
        out
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for MessageTemplate {
    fn from(text: &str) -> Self {
        MessageTemplate::parse(text)
    }
}

impl From<String> for MessageTemplate {
    fn from(text: String) -> Self {
        MessageTemplate::parse(text)
    }
}

fn tokenize(text: &str) -> Vec<TemplateToken> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '{' if rest.starts_with("{{") => {
                literal.push('{');
                rest = &rest[2..];
            }
            '}' if rest.starts_with("}}") => {
                literal.push('}');
                rest = &rest[2..];
            }
            '{' => match rest.find('}') {
                Some(end) => {
                    let raw_text = &rest[..=end];
                    match PropertyToken::parse(&rest[1..end], raw_text) {
                        Some(property) => {
                            if !literal.is_empty() {
                                tokens.push(TemplateToken::Text(std::mem::take(&mut literal)));
                            }
                            tokens.push(TemplateToken::Property(property));
                        }
                        None => literal.push_str(raw_text),
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    literal.push_str(rest);
                    rest = "";
                }
            },
            other => {
                literal.push(other);
                rest = &rest[other.len_utf8()..];
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(TemplateToken::Text(literal));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PropertyValue;

    fn props(pairs: &[(&str, PropertyValue)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_text_and_properties() {
        let template = MessageTemplate::parse("User {UserId} logged in");
        assert_eq!(template.tokens().len(), 3);

        let token = template.property_tokens().next().unwrap();
        assert_eq!(token.name(), "UserId");
        assert_eq!(token.format(), None);
        assert_eq!(token.raw_text(), "{UserId}");
    }

    #[test]
    fn test_parse_format_alignment_and_hints() {
        let template = MessageTemplate::parse("{@Order} {$Id} {Total,-8:F2}");
        let tokens: Vec<_> = template.property_tokens().collect();

        assert_eq!(tokens[0].destructuring(), Destructuring::Destructure);
        assert_eq!(tokens[1].destructuring(), Destructuring::Stringify);
        assert_eq!(tokens[2].format(), Some("F2"));
        assert_eq!(
            tokens[2].alignment(),
            Some(Alignment {
                direction: AlignmentDirection::Left,
                width: 8
            })
        );
    }

    #[test]
    fn test_escaped_and_malformed_braces() {
        let template = MessageTemplate::parse("{{literal}} {not valid} {open");
        assert_eq!(template.property_tokens().count(), 0);
        assert_eq!(
            template.render(&Properties::new()),
            "{literal} {not valid} {open"
        );
    }

    #[test]
    fn test_render_substitutes_values() {
        let template = MessageTemplate::parse("User {UserId} logged in as {Name}");
        let properties = props(&[("UserId", 42.into()), ("Name", "alice".into())]);

        assert_eq!(
            template.render(&properties),
            "User 42 logged in as \"alice\""
        );
    }

    #[test]
    fn test_render_missing_property_keeps_placeholder() {
        let template = MessageTemplate::parse("Hello {Who:l}");
        assert_eq!(template.render(&Properties::new()), "Hello {Who:l}");
    }

    #[test]
    fn test_render_literal_and_alignment() {
        let template = MessageTemplate::parse("[{Name,6:l}] [{Code,-4}]");
        let properties = props(&[("Name", "bob".into()), ("Code", 7.into())]);

        assert_eq!(template.render(&properties), "[   bob] [7   ]");
    }

    #[test]
    fn test_single_token_render() {
        let template = MessageTemplate::parse("Took {Elapsed:F1} ms");
        let token = template.property_tokens().next().unwrap();
        let properties = props(&[("Elapsed", 12.345.into())]);

        let mut out = String::new();
        token.render(&properties, &mut out);
        assert_eq!(out, "12.3");
    }

    #[test]
    fn test_unicode_text_survives_tokenizing() {
        let template = MessageTemplate::parse("héllo {Name} — ✓");
        let properties = props(&[("Name", "日本".into())]);
        assert_eq!(template.render(&properties), "héllo \"日本\" — ✓");
    }
}
