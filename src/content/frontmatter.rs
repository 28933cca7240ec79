//! Front-matter parsing
//!
//! A document may open with a YAML block fenced by `---` lines. The block is
//! parsed into a mapping and the rest of the file is the body. Documents that
//! do not start with a fence have an empty mapping and the whole text as body.
//!
//! The helpers at the bottom read individual fields out of the mapping with
//! the coercion rules shared by blog posts and projects.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors emitted while splitting or parsing front-matter
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// Opening `---` without a closing one
    #[error("unterminated front-matter block: expected closing '---'")]
    Unterminated,

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML parsed, but its top level is a list or a scalar
    #[error("front-matter must be a mapping at the top level")]
    NotAMapping,
}

/// Parsed front-matter and the body that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    pub data: Mapping,
    pub body: &'a str,
}

impl<'a> FrontMatter<'a> {
    /// Split `content` into front-matter data and body
    pub fn parse(content: &'a str) -> Result<Self, FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        let opening = match lines.next() {
            Some(line) if is_fence(line) => line,
            _ => {
                return Ok(Self {
                    data: Mapping::new(),
                    body: content,
                })
            }
        };

        let yaml_start = opening.len();
        let mut offset = yaml_start;
        for line in lines {
            if is_fence(line) {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                return Ok(Self {
                    data: parse_yaml(yaml)?,
                    body,
                });
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

fn parse_yaml(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

/// Render a scalar as text. Sequences, mappings and null have no text form.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// A text field, empty when absent or not a scalar
pub fn text_field(data: &Mapping, key: &str) -> String {
    data.get(key).and_then(scalar_string).unwrap_or_default()
}

/// A list field taken as-is: scalar elements of a sequence, nothing otherwise
pub fn sequence_field(data: &Mapping, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_string).collect(),
        _ => Vec::new(),
    }
}

/// A list field that also accepts a single scalar as a one-element list
pub fn string_or_sequence_field(data: &Mapping, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Sequence(_)) => sequence_field(data, key),
        Some(value) => scalar_string(value).into_iter().collect(),
        None => Vec::new(),
    }
}

/// A finite number, given either as a YAML number or as numeric text
pub fn number_field(data: &Mapping, key: &str) -> Option<f64> {
    let number = match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - web
---

This is the content.
"#;

        let fm = FrontMatter::parse(content).unwrap();
        assert_eq!(text_field(&fm.data, "title"), "Hello World");
        assert_eq!(text_field(&fm.data, "date"), "2024-01-15 10:30:00");
        assert_eq!(sequence_field(&fm.data, "tags"), vec!["rust", "web"]);
        assert_eq!(fm.body, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let fm = FrontMatter::parse(content).unwrap();
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_fence_must_open_the_file() {
        let content = "\n---\ntitle: late\n---\nbody";
        let fm = FrontMatter::parse(content).unwrap();
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let fm = FrontMatter::parse("---\n---\nbody").unwrap();
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let fm = FrontMatter::parse(content).unwrap();
        assert_eq!(text_field(&fm.data, "title"), "Windows");
        assert_eq!(fm.body, "body\r\n");
    }

    #[test]
    fn test_unterminated_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: open\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_top_level_list_is_rejected() {
        let err = FrontMatter::parse("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping));
    }

    #[test]
    fn test_field_coercion() {
        let fm = FrontMatter::parse(
            "---\ntitle: 42\ndescription: [not, text]\ncategories: Notes\norder: \" 7 \"\n---\n",
        )
        .unwrap();
        assert_eq!(text_field(&fm.data, "title"), "42");
        assert_eq!(text_field(&fm.data, "description"), "");
        assert_eq!(text_field(&fm.data, "missing"), "");
        assert_eq!(string_or_sequence_field(&fm.data, "categories"), vec!["Notes"]);
        assert!(sequence_field(&fm.data, "categories").is_empty());
        assert_eq!(number_field(&fm.data, "order"), Some(7.0));
    }

    #[test]
    fn test_number_field_rejects_non_numeric() {
        let fm = FrontMatter::parse("---\na: soon\nb: .inf\nc: ~\nd: 2.5\n---\n").unwrap();
        assert_eq!(number_field(&fm.data, "a"), None);
        assert_eq!(number_field(&fm.data, "b"), None);
        assert_eq!(number_field(&fm.data, "c"), None);
        assert_eq!(number_field(&fm.data, "d"), Some(2.5));
        assert_eq!(number_field(&fm.data, "missing"), None);
    }
}
