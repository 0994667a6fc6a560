//! Parse diagnostics and user-friendly rendering.
//!
//! A ParseDiagnostic is structured data describing what is wrong with one
//! paragraph of a descriptor. Rendering turns a batch of them into
//! `Diagnostic` values with context and suggested fixes; printing is left to
//! the caller.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a CONTROL file has fields we do not know.
    pub const UNKNOWN_FIELDS: &str =
        "Field names are case-sensitive; check the spelling against the list above";

    /// Suggestion when a newer port format may be in use.
    pub const UPDATE_TOOL: &str =
        "A newer port format may be in use; update harbour-ports and try again";

    /// Suggestion when a required field is absent.
    pub const MISSING_FIELDS: &str = "Add the missing fields to the paragraph";
}

/// Structural problems found in one paragraph of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Paragraph subject: package or feature name, or the descriptor path
    pub name: String,
    /// Free-text error
    pub error: Option<String>,
    /// Required fields that were absent
    pub missing_fields: BTreeSet<String>,
    /// Fields that are not valid in this paragraph
    pub extra_fields: BTreeSet<String>,
    /// Fields the paragraph's kind accepts
    pub valid_fields: &'static [&'static str],
}

impl ParseDiagnostic {
    pub fn new(name: impl Into<String>) -> Self {
        ParseDiagnostic {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_valid_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.valid_fields = fields;
        self
    }

    /// Check whether this diagnostic reports any problem at all.
    pub fn has_problems(&self) -> bool {
        self.error.is_some() || !self.missing_fields.is_empty() || !self.extra_fields.is_empty()
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Render a batch of parse diagnostics.
///
/// Free-text errors come first, then unexpected fields (with the fields that
/// paragraph accepts), then missing fields. A diagnostic with no problems at
/// all (an empty descriptor) renders as a bare load failure.
pub fn render_parse_diagnostics(diagnostics: &[ParseDiagnostic]) -> Vec<Diagnostic> {
    let mut rendered = Vec::new();

    for diag in diagnostics {
        if !diag.has_problems() {
            rendered.push(Diagnostic::error(format!(
                "`{}` does not contain any paragraphs",
                diag.name
            )));
        } else if let Some(ref error) = diag.error {
            rendered.push(
                Diagnostic::error(format!("while loading `{}`", diag.name))
                    .with_context(error.clone()),
            );
        }
    }

    for diag in diagnostics.iter().filter(|d| !d.extra_fields.is_empty()) {
        let mut out = Diagnostic::error(format!(
            "there are invalid fields in the control file of `{}`",
            diag.name
        ));
        for field in &diag.extra_fields {
            out = out.with_context(format!("unexpected field: {}", field));
        }
        out = out
            .with_context(format!(
                "valid fields (case-sensitive): {}",
                diag.valid_fields.join(", ")
            ))
            .with_suggestion(suggestions::UNKNOWN_FIELDS)
            .with_suggestion(suggestions::UPDATE_TOOL);
        rendered.push(out);
    }

    for diag in diagnostics.iter().filter(|d| !d.missing_fields.is_empty()) {
        let mut out = Diagnostic::error(format!(
            "there are missing fields in the control file of `{}`",
            diag.name
        ));
        for field in &diag.missing_fields {
            out = out.with_context(format!("missing field: {}", field));
        }
        rendered.push(out.with_suggestion(suggestions::MISSING_FIELDS));
    }

    rendered
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
