//! Dependency edges and the `Build-Depends` list grammar.
//!
//! A Dependency names another port, the features it needs from that port,
//! and an optional qualifier deciding on which triplets the edge exists.
//!
//! List syntax, as written in CONTROL files:
//!
//! ```text
//! zlib, openssl[core,tools] (!uwp), curl (windows & !static)
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::util::paragraphs::TextRowCol;

/// A dependency edge as declared by a port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    /// Target port name
    name: String,

    /// Features to enable (empty means default features only)
    features: BTreeSet<String>,

    /// Boolean qualifier expression (empty means unconditional)
    qualifier: String,
}

impl Dependency {
    /// Create an unconditional dependency on a port's default features.
    pub fn new(name: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            features: BTreeSet::new(),
            qualifier: String::new(),
        }
    }

    /// Set features to enable.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set the qualifier expression.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Get the target port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the requested features.
    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    /// Get the qualifier expression (may be empty).
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Check whether this edge applies on every triplet.
    pub fn is_unconditional(&self) -> bool {
        self.qualifier.is_empty()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.features.is_empty() {
            let features: Vec<&str> = self.features.iter().map(String::as_str).collect();
            write!(f, "[{}]", features.join(","))?;
        }
        if !self.qualifier.is_empty() {
            write!(f, " ({})", self.qualifier)?;
        }
        Ok(())
    }
}

/// Malformed dependency or feature list text.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("{origin}:{row}:{column}: {message}")]
#[diagnostic(
    code(harbour::ports::malformed_dependencies),
    help("Dependencies are written as `name[feature,...] (qualifier)`, separated by commas")
)]
pub struct DependencyParseError {
    pub origin: String,
    pub row: usize,
    pub column: usize,
    pub message: String,
}

/// Parse a comma-separated dependency list.
///
/// `position` is where `text` starts inside `origin`; reported error
/// positions are relative to it.
pub fn parse_dependencies(
    text: &str,
    origin: &str,
    position: TextRowCol,
) -> Result<Vec<Dependency>, DependencyParseError> {
    let mut cursor = Cursor::new(text, origin, position);
    let mut deps = Vec::new();

    cursor.skip_whitespace();
    if cursor.at_end() {
        return Ok(deps);
    }

    loop {
        cursor.skip_whitespace();
        let name = cursor.identifier("package name")?;

        cursor.skip_whitespace();
        let mut features = BTreeSet::new();
        if cursor.eat('[') {
            loop {
                cursor.skip_whitespace();
                features.insert(cursor.feature_name()?);
                cursor.skip_whitespace();
                match cursor.peek() {
                    Some(',') => cursor.bump(),
                    Some(']') => {
                        cursor.bump();
                        break;
                    }
                    _ => return Err(cursor.error("expected `,` or `]` in feature list")),
                };
            }
        }

        cursor.skip_whitespace();
        let mut qualifier = String::new();
        if cursor.peek() == Some('(') {
            qualifier = cursor.qualifier()?;
        }

        deps.push(Dependency {
            name,
            features,
            qualifier,
        });

        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some(',') => cursor.bump(),
            Some(_) => return Err(cursor.error("expected `,` or end of dependency list")),
        };
    }

    Ok(deps)
}

/// Parse a comma-separated list of feature names (`Default-Features`).
pub fn parse_feature_names(
    text: &str,
    origin: &str,
    position: TextRowCol,
) -> Result<Vec<String>, DependencyParseError> {
    let mut cursor = Cursor::new(text, origin, position);
    let mut names = Vec::new();

    cursor.skip_whitespace();
    if cursor.at_end() {
        return Ok(names);
    }

    loop {
        cursor.skip_whitespace();
        names.push(cursor.identifier("feature name")?);
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some(',') => cursor.bump(),
            Some(_) => return Err(cursor.error("expected `,` or end of feature list")),
        };
    }

    Ok(names)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    origin: &'a str,
    row: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, origin: &'a str, position: TextRowCol) -> Self {
        Cursor {
            chars: text.chars().peekable(),
            origin,
            row: position.row.max(1),
            column: position.column.max(1),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn identifier(&mut self, what: &str) -> Result<String, DependencyParseError> {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|c| is_identifier_char(*c)) {
            ident.push(c);
            self.bump();
        }
        if ident.is_empty() {
            return Err(self.error(format!(
                "expected {} (lowercase letters, digits, and `-`)",
                what
            )));
        }
        Ok(ident)
    }

    fn feature_name(&mut self) -> Result<String, DependencyParseError> {
        if self.eat('*') {
            return Ok("*".to_string());
        }
        self.identifier("feature name")
    }

    /// Consume `( ... )` and return the trimmed inner text.
    fn qualifier(&mut self) -> Result<String, DependencyParseError> {
        let (row, column) = (self.row, self.column);
        self.bump();

        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(DependencyParseError {
                    origin: self.origin.to_string(),
                    row,
                    column,
                    message: "unterminated qualifier, expected `)`".to_string(),
                });
            };
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            text.push(c);
        }

        let qualifier = text.trim().to_string();
        if qualifier.is_empty() {
            return Err(DependencyParseError {
                origin: self.origin.to_string(),
                row,
                column,
                message: "empty qualifier".to_string(),
            });
        }
        Ok(qualifier)
    }

    fn error(&self, message: impl Into<String>) -> DependencyParseError {
        DependencyParseError {
            origin: self.origin.to_string(),
            row: self.row,
            column: self.column,
            message: message.into(),
        }
    }
}
