//! CONTROL file tokenizer.
//!
//! Splits `Field: value` text into paragraphs separated by blank lines.
//! Lines starting with a space or tab continue the previous field; lines
//! starting with `#` are comments.

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// A 1-based position in descriptor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRowCol {
    pub row: usize,
    pub column: usize,
}

impl TextRowCol {
    pub fn new(row: usize, column: usize) -> Self {
        TextRowCol { row, column }
    }
}

impl fmt::Display for TextRowCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A field value and where its text starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub text: String,
    pub position: TextRowCol,
}

impl FieldValue {
    pub fn new(text: impl Into<String>, position: TextRowCol) -> Self {
        FieldValue {
            text: text.into(),
            position,
        }
    }
}

/// One paragraph: field name to value.
pub type Paragraph = BTreeMap<String, FieldValue>;

/// Malformed paragraph text.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ParagraphError {
    #[error("{origin}:{row}: continuation line without a preceding field")]
    #[diagnostic(code(harbour::ports::orphan_continuation))]
    OrphanContinuation { origin: String, row: usize },

    #[error("{origin}:{row}: expected `Field: value`")]
    #[diagnostic(code(harbour::ports::missing_colon))]
    MissingColon { origin: String, row: usize },

    #[error("{origin}:{row}: invalid field name `{name}`")]
    #[diagnostic(
        code(harbour::ports::invalid_field_name),
        help("Field names contain only ASCII letters, digits, and `-`")
    )]
    InvalidFieldName {
        origin: String,
        row: usize,
        name: String,
    },

    #[error("{origin}:{row}: field `{name}` appears twice in one paragraph")]
    #[diagnostic(code(harbour::ports::duplicate_field))]
    DuplicateField {
        origin: String,
        row: usize,
        name: String,
    },
}

/// Split descriptor text into paragraphs.
pub fn parse_paragraphs(text: &str, origin: &str) -> Result<Vec<Paragraph>, ParagraphError> {
    let mut paragraphs = Vec::new();
    let mut current = Paragraph::new();
    let mut last_field: Option<String> = None;

    for (idx, line) in text.lines().enumerate() {
        let row = idx + 1;

        if line.starts_with('#') {
            continue;
        }

        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            last_field = None;
            continue;
        }

        if line.starts_with([' ', '\t']) {
            let value = last_field
                .as_ref()
                .and_then(|name| current.get_mut(name))
                .ok_or_else(|| ParagraphError::OrphanContinuation {
                    origin: origin.to_string(),
                    row,
                })?;
            value.text.push('\n');
            value.text.push_str(line.trim());
            continue;
        }

        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| ParagraphError::MissingColon {
                origin: origin.to_string(),
                row,
            })?;

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ParagraphError::InvalidFieldName {
                origin: origin.to_string(),
                row,
                name: name.to_string(),
            });
        }

        if current.contains_key(name) {
            return Err(ParagraphError::DuplicateField {
                origin: origin.to_string(),
                row,
                name: name.to_string(),
            });
        }

        // Columns count chars, matching the dependency grammar's cursor.
        let leading = rest.chars().take_while(|c| c.is_whitespace()).count();
        let position = TextRowCol::new(row, name.chars().count() + 1 + leading + 1);
        current.insert(name.to_string(), FieldValue::new(rest.trim(), position));
        last_field = Some(name.to_string());
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    tracing::debug!("{}: tokenized {} paragraph(s)", origin, paragraphs.len());

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_paragraph() {
        let text = "Source: zlib\nVersion: 1.2.11\nDescription: A compression library\n";
        let paragraphs = parse_paragraphs(text, "CONTROL").unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0]["Source"].text, "zlib");
        assert_eq!(paragraphs[0]["Version"].position, TextRowCol::new(2, 10));
    }

    #[test]
    fn test_columns_count_chars() {
        // U+3000 is one char of whitespace but three bytes.
        let text = "Description:\u{3000}Ünïcode\nVersion:\t1\n";
        let paragraphs = parse_paragraphs(text, "CONTROL").unwrap();
        assert_eq!(paragraphs[0]["Description"].text, "Ünïcode");
        assert_eq!(paragraphs[0]["Description"].position, TextRowCol::new(1, 15));
        assert_eq!(paragraphs[0]["Version"].position, TextRowCol::new(2, 10));
    }

    #[test]
    fn test_multiple_paragraphs_and_comments() {
        let text = "\n# comment\nSource: curl\nVersion: 7.68.0\n\n\nFeature: ssl\n# inline comment\nDescription: SSL support\n\n";
        let paragraphs = parse_paragraphs(text, "CONTROL").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1]["Feature"].text, "ssl");
        assert_eq!(paragraphs[1]["Description"].text, "SSL support");
    }

    #[test]
    fn test_continuation_lines() {
        let text = "Source: foo\nMaintainer: Alice <a@example.com>\n  Bob <b@example.com>\nVersion: 1\n";
        let paragraphs = parse_paragraphs(text, "CONTROL").unwrap();
        assert_eq!(
            paragraphs[0]["Maintainer"].text,
            "Alice <a@example.com>\nBob <b@example.com>"
        );
    }

    #[test]
    fn test_empty_value() {
        let paragraphs = parse_paragraphs("Source: foo\nType:\n", "CONTROL").unwrap();
        assert_eq!(paragraphs[0]["Type"].text, "");
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_paragraphs("", "CONTROL").unwrap().is_empty());
        assert!(parse_paragraphs("\n\n# only a comment\n", "CONTROL").unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_paragraphs("  dangling\n", "CONTROL"),
            Err(ParagraphError::OrphanContinuation { row: 1, .. })
        ));
        assert!(matches!(
            parse_paragraphs("Source: foo\nno colon here\n", "CONTROL"),
            Err(ParagraphError::MissingColon { row: 2, .. })
        ));
        assert!(matches!(
            parse_paragraphs("Bad Name: foo\n", "CONTROL"),
            Err(ParagraphError::InvalidFieldName { .. })
        ));
        assert!(matches!(
            parse_paragraphs("Source: a\nSource: b\n", "CONTROL"),
            Err(ParagraphError::DuplicateField { row: 2, .. })
        ));
    }
}
