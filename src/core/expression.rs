//! Qualifier expressions.
//!
//! Qualifiers are small boolean expressions over platform identifiers:
//!
//! ```text
//! windows & !uwp
//! (linux | osx) & !static
//! x64-windows-static
//! ```
//!
//! `,` is accepted as a legacy spelling of `|`. Mixing `&` and `|` at one
//! nesting level requires parentheses.

use std::collections::HashMap;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Build variable holding the target architecture (`x64`, `arm64`, ...).
pub const TARGET_ARCHITECTURE: &str = "VCPKG_TARGET_ARCHITECTURE";
/// Build variable holding the CMake system name (`Linux`, `Darwin`, ...).
pub const CMAKE_SYSTEM_NAME: &str = "VCPKG_CMAKE_SYSTEM_NAME";
/// Build variable holding the library linkage (`static` or `dynamic`).
pub const LIBRARY_LINKAGE: &str = "VCPKG_LIBRARY_LINKAGE";

/// Deepest nesting of `!` and parentheses a qualifier may use.
pub const MAX_NESTING_DEPTH: usize = 128;

/// What a qualifier is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Canonical triplet name, e.g. `x64-windows`
    pub triplet: &'a str,
    /// Build variables for the triplet
    pub variables: &'a HashMap<String, String>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(triplet: &'a str, variables: &'a HashMap<String, String>) -> Self {
        EvaluationContext { triplet, variables }
    }

    fn has_platform_variables(&self) -> bool {
        [TARGET_ARCHITECTURE, CMAKE_SYSTEM_NAME, LIBRARY_LINKAGE]
            .iter()
            .any(|key| self.variables.contains_key(*key))
    }

    fn variable(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    fn identifier_value(&self, name: &str) -> bool {
        if name == self.triplet {
            return true;
        }

        if !self.has_platform_variables() {
            // No build variables yet: fall back to matching the triplet name.
            return self
                .triplet
                .to_ascii_lowercase()
                .contains(&name.to_ascii_lowercase());
        }

        let arch = self.variable(TARGET_ARCHITECTURE);
        let system = self.variable(CMAKE_SYSTEM_NAME);
        match name {
            "x64" => arch == Some("x64"),
            "x86" => arch == Some("x86"),
            "arm" => matches!(arch, Some("arm") | Some("arm64")),
            "arm64" => arch == Some("arm64"),
            "wasm32" => arch == Some("wasm32"),
            "windows" => matches!(system, None | Some("") | Some("WindowsStore")),
            "uwp" => system == Some("WindowsStore"),
            "linux" => system == Some("Linux"),
            "osx" => system == Some("Darwin"),
            "android" => system == Some("Android"),
            "emscripten" => system == Some("Emscripten"),
            "static" => self.variable(LIBRARY_LINKAGE) == Some("static"),
            _ => {
                tracing::debug!("unknown qualifier identifier `{}` evaluates to false", name);
                false
            }
        }
    }
}

/// A malformed qualifier expression.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("invalid qualifier `{expression}` at offset {offset}: {message}")]
#[diagnostic(
    code(harbour::ports::invalid_qualifier),
    help("Qualifiers combine identifiers with `!`, `&`, `|`, and parentheses")
)]
pub struct ExpressionError {
    pub expression: String,
    pub offset: usize,
    pub message: String,
}

/// Evaluate a qualifier expression.
pub fn evaluate(expression: &str, context: &EvaluationContext<'_>) -> Result<bool, ExpressionError> {
    let mut parser = ExpressionParser {
        text: expression,
        pos: 0,
        depth: 0,
        context,
    };

    let value = parser.expr()?;
    parser.skip_whitespace();
    if parser.pos != expression.len() {
        return Err(parser.error("unexpected character"));
    }
    Ok(value)
}

struct ExpressionParser<'a, 'c> {
    text: &'a str,
    pos: usize,
    depth: usize,
    context: &'c EvaluationContext<'c>,
}

impl ExpressionParser<'_, '_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn error(&self, message: &str) -> ExpressionError {
        ExpressionError {
            expression: self.text.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }

    // expr := unary ('&' unary)* | unary (('|' | ',') unary)*
    fn expr(&mut self) -> Result<bool, ExpressionError> {
        let mut value = self.unary()?;
        self.skip_whitespace();

        match self.peek() {
            Some(b'&') => {
                while self.peek() == Some(b'&') {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = value && rhs;
                    self.skip_whitespace();
                }
                if matches!(self.peek(), Some(b'|') | Some(b',')) {
                    return Err(self.error("mixing `&` and `|` requires parentheses"));
                }
            }
            Some(b'|') | Some(b',') => {
                while matches!(self.peek(), Some(b'|') | Some(b',')) {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = value || rhs;
                    self.skip_whitespace();
                }
                if self.peek() == Some(b'&') {
                    return Err(self.error("mixing `&` and `|` requires parentheses"));
                }
            }
            _ => {}
        }

        Ok(value)
    }

    fn unary(&mut self) -> Result<bool, ExpressionError> {
        self.skip_whitespace();
        if self.peek() == Some(b'!') {
            self.enter()?;
            self.pos += 1;
            let value = self.unary()?;
            self.depth -= 1;
            return Ok(!value);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<bool, ExpressionError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'(') => {
                self.enter()?;
                self.pos += 1;
                let value = self.expr()?;
                self.skip_whitespace();
                if self.peek() != Some(b')') {
                    return Err(self.error("expected `)`"));
                }
                self.pos += 1;
                self.depth -= 1;
                Ok(value)
            }
            Some(b) if is_identifier_byte(b) => {
                let start = self.pos;
                while self.peek().is_some_and(is_identifier_byte) {
                    self.pos += 1;
                }
                Ok(self.context.identifier_value(&self.text[start..self.pos]))
            }
            None => Err(self.error("unexpected end of expression")),
            Some(_) => Err(self.error("expected identifier, `!`, or `(`")),
        }
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-'
}
