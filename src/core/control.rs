//! CONTROL file ingestion.
//!
//! A CONTROL file is a sequence of paragraphs: the first describes the port
//! itself, every following one describes a feature. Field-presence problems
//! are collected across all paragraphs and reported together; malformed
//! dependency text aborts the whole parse immediately.

use std::collections::BTreeSet;
use std::path::Path;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::dependency::{parse_dependencies, parse_feature_names, DependencyParseError};
use crate::core::package_id::PackageIdentity;
use crate::core::paragraph::{FeatureParagraph, PortKind, SourceParagraph};
use crate::core::source_control_file::SourceControlFile;
use crate::util::diagnostic::ParseDiagnostic;
use crate::util::paragraphs::{FieldValue, Paragraph, TextRowCol};

/// CONTROL field names (case-sensitive).
pub mod fields {
    pub const SOURCE: &str = "Source";
    pub const VERSION: &str = "Version";
    pub const DESCRIPTION: &str = "Description";
    pub const MAINTAINERS: &str = "Maintainer";
    pub const HOMEPAGE: &str = "Homepage";
    pub const BUILD_DEPENDS: &str = "Build-Depends";
    pub const DEFAULT_FEATURES: &str = "Default-Features";
    pub const SUPPORTS: &str = "Supports";
    pub const TYPE: &str = "Type";
    pub const FEATURE: &str = "Feature";
}

/// Fields accepted in the core paragraph.
pub const SOURCE_PARAGRAPH_FIELDS: &[&str] = &[
    fields::SOURCE,
    fields::VERSION,
    fields::DESCRIPTION,
    fields::MAINTAINERS,
    fields::BUILD_DEPENDS,
    fields::DEFAULT_FEATURES,
    fields::HOMEPAGE,
    fields::TYPE,
    fields::SUPPORTS,
];

/// Fields accepted in a feature paragraph.
pub const FEATURE_PARAGRAPH_FIELDS: &[&str] =
    &[fields::FEATURE, fields::DESCRIPTION, fields::BUILD_DEPENDS];

/// Why a CONTROL file was rejected.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ControlFileError {
    /// Field-level problems, one entry per offending paragraph, in order.
    #[error("invalid control file `{path}`: {} paragraph(s) with problems", .diagnostics.len())]
    #[diagnostic(code(harbour::ports::invalid_control_file))]
    Invalid {
        path: String,
        diagnostics: Vec<ParseDiagnostic>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedDependencyText(#[from] DependencyParseError),
}

impl ControlFileError {
    /// Batched diagnostics, empty for dependency text failures.
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        match self {
            ControlFileError::Invalid { diagnostics, .. } => diagnostics,
            ControlFileError::MalformedDependencyText(_) => &[],
        }
    }
}

/// Consumes fields out of one paragraph, tracking what was missing.
struct ParagraphParser {
    fields: Paragraph,
    missing: BTreeSet<String>,
}

impl ParagraphParser {
    fn new(fields: Paragraph) -> Self {
        ParagraphParser {
            fields,
            missing: BTreeSet::new(),
        }
    }

    fn required_field(&mut self, name: &str) -> String {
        match self.fields.remove(name) {
            Some(value) => value.text,
            None => {
                self.missing.insert(name.to_string());
                String::new()
            }
        }
    }

    fn optional_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    fn optional_text(&mut self, name: &str) -> String {
        self.optional_field(name).map(|v| v.text).unwrap_or_default()
    }

    /// Everything left unconsumed is an unrecognized field.
    fn into_diagnostic(
        self,
        subject: &str,
        valid_fields: &'static [&'static str],
    ) -> Option<ParseDiagnostic> {
        if self.missing.is_empty() && self.fields.is_empty() {
            return None;
        }
        Some(ParseDiagnostic {
            name: subject.to_string(),
            error: None,
            missing_fields: self.missing,
            extra_fields: self.fields.into_keys().collect(),
            valid_fields,
        })
    }
}

fn field_or_empty(value: Option<FieldValue>) -> (String, TextRowCol) {
    value
        .map(|v| (v.text, v.position))
        .unwrap_or_else(|| (String::new(), TextRowCol::new(1, 1)))
}

/// Split on newlines and trim each piece. Empty text yields no maintainers.
fn split_maintainers(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(|m| m.trim().to_string()).collect()
}

fn parse_source_paragraph(
    origin: &str,
    fields: Paragraph,
) -> Result<(SourceParagraph, Option<ParseDiagnostic>), DependencyParseError> {
    let mut parser = ParagraphParser::new(fields);

    let name = parser.required_field(fields::SOURCE);
    let version = parser.required_field(fields::VERSION);
    let description = parser.optional_text(fields::DESCRIPTION);
    let maintainers = split_maintainers(&parser.optional_text(fields::MAINTAINERS));
    let homepage = parser.optional_field(fields::HOMEPAGE).map(|v| v.text);

    let (text, position) = field_or_empty(parser.optional_field(fields::BUILD_DEPENDS));
    let depends = parse_dependencies(&text, origin, position)?;

    let (text, position) = field_or_empty(parser.optional_field(fields::DEFAULT_FEATURES));
    let default_features = parse_feature_names(&text, origin, position)?;

    let supports_expression = parser
        .optional_field(fields::SUPPORTS)
        .map(|v| v.text)
        .filter(|s| !s.is_empty());
    let kind = PortKind::from_field(&parser.optional_text(fields::TYPE));

    let subject = if name.is_empty() { origin } else { name.as_str() };
    let diagnostic = parser.into_diagnostic(subject, SOURCE_PARAGRAPH_FIELDS);

    let paragraph = SourceParagraph {
        id: PackageIdentity::new(name, version),
        description,
        maintainers,
        homepage,
        depends,
        default_features,
        supports_expression,
        kind,
    };

    Ok((paragraph, diagnostic))
}

fn parse_feature_paragraph(
    origin: &str,
    fields: Paragraph,
) -> Result<(FeatureParagraph, Option<ParseDiagnostic>), DependencyParseError> {
    let mut parser = ParagraphParser::new(fields);

    let name = parser.required_field(fields::FEATURE);
    let description = parser.required_field(fields::DESCRIPTION);

    let (text, position) = field_or_empty(parser.optional_field(fields::BUILD_DEPENDS));
    let depends = parse_dependencies(&text, origin, position)?;

    let subject = if name.is_empty() { origin } else { name.as_str() };
    let diagnostic = parser.into_diagnostic(subject, FEATURE_PARAGRAPH_FIELDS);

    Ok((
        FeatureParagraph {
            name,
            description,
            depends,
        },
        diagnostic,
    ))
}

/// Parse CONTROL paragraphs, collecting every field-level diagnostic.
///
/// The first paragraph is the core paragraph; every other paragraph is a
/// feature. Field problems come first in paragraph order, followed by the
/// feature-name problems `SourceControlFile::validate` finds among the
/// well-formed features. Fails with `Invalid` if there is any problem, and
/// with `MalformedDependencyText` as soon as dependency text fails to parse.
pub fn parse_control_paragraphs(
    path: &Path,
    paragraphs: Vec<Paragraph>,
) -> Result<SourceControlFile, ControlFileError> {
    let origin = path.display().to_string();

    let mut paragraphs = paragraphs.into_iter();
    let Some(core_fields) = paragraphs.next() else {
        return Err(ControlFileError::Invalid {
            diagnostics: vec![ParseDiagnostic::new(origin.clone())],
            path: origin,
        });
    };

    let mut diagnostics = Vec::new();

    let (core_paragraph, diagnostic) = parse_source_paragraph(&origin, core_fields)?;
    diagnostics.extend(diagnostic);

    let mut feature_paragraphs = Vec::new();
    for fields in paragraphs {
        let (feature, diagnostic) = parse_feature_paragraph(&origin, fields)?;
        match diagnostic {
            Some(diagnostic) => diagnostics.push(diagnostic),
            None => feature_paragraphs.push(feature),
        }
    }

    let scf = SourceControlFile::new(core_paragraph, feature_paragraphs);
    diagnostics.extend(scf.validate().into_iter().map(|problem| {
        ParseDiagnostic::new(problem.feature())
            .with_error(problem.to_string())
            .with_valid_fields(FEATURE_PARAGRAPH_FIELDS)
    }));

    if !diagnostics.is_empty() {
        tracing::debug!(
            "{}: {} paragraph(s) with problems",
            origin,
            diagnostics.len()
        );
        return Err(ControlFileError::Invalid {
            path: origin,
            diagnostics,
        });
    }

    tracing::debug!(
        "{}: parsed `{}` with {} feature(s)",
        origin,
        scf.name(),
        scf.feature_paragraphs.len()
    );

    Ok(scf)
}
