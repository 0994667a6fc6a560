//! vcpkg.json manifest ingestion.
//!
//! Unlike CONTROL files, manifests fail fast: the first problem aborts the
//! parse and no partial model is produced. Keys starting with `$` are
//! directives (e.g. `$schema`) and are always accepted.

use std::path::Path;

use miette::Diagnostic as MietteDiagnostic;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::dependency::Dependency;
use crate::core::package_id::PackageIdentity;
use crate::core::paragraph::SourceParagraph;
use crate::core::source_control_file::SourceControlFile;

/// Manifest keys (case-sensitive).
pub mod keys {
    pub const NAME: &str = "name";
    pub const VERSION: &str = "version";
    pub const DESCRIPTION: &str = "description";
    pub const MAINTAINERS: &str = "maintainers";
    pub const DEPENDENCIES: &str = "dependencies";
    pub const HOMEPAGE: &str = "homepage";
    pub const SUPPORTS: &str = "supports";
}

/// Top-level keys a manifest may contain.
pub const MANIFEST_FIELDS: &[&str] = &[
    keys::NAME,
    keys::VERSION,
    keys::DESCRIPTION,
    keys::MAINTAINERS,
    keys::DEPENDENCIES,
    keys::HOMEPAGE,
    keys::SUPPORTS,
];

/// Why a manifest was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("`{path}`: manifest must be a JSON object")]
    #[diagnostic(code(harbour::ports::manifest_not_object))]
    NotAnObject { path: String },

    #[error("`{path}`: unknown field `{key}`")]
    #[diagnostic(
        code(harbour::ports::unknown_manifest_key),
        help("Valid fields are: name, version, description, maintainers, dependencies, homepage, supports")
    )]
    UnknownKey { path: String, key: String },

    #[error("`{path}`: missing required field `{key}`")]
    #[diagnostic(code(harbour::ports::missing_manifest_field))]
    MissingField { path: String, key: &'static str },

    #[error("`{path}`: field `{key}` must be {expected}")]
    #[diagnostic(code(harbour::ports::malformed_manifest_field))]
    MalformedField {
        path: String,
        key: &'static str,
        expected: &'static str,
    },
}

fn is_directive(key: &str) -> bool {
    key.starts_with('$')
}

struct ManifestReader<'a> {
    path: String,
    object: &'a Map<String, Value>,
}

impl ManifestReader<'_> {
    fn malformed(&self, key: &'static str, expected: &'static str) -> ManifestError {
        ManifestError::MalformedField {
            path: self.path.clone(),
            key,
            expected,
        }
    }

    fn required_string(&self, key: &'static str) -> Result<String, ManifestError> {
        match self.object.get(key) {
            None => Err(ManifestError::MissingField {
                path: self.path.clone(),
                key,
            }),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.malformed(key, "a string")),
        }
    }

    fn optional_string(&self, key: &'static str) -> Result<Option<String>, ManifestError> {
        match self.object.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.malformed(key, "a string")),
        }
    }

    fn string_array(&self, key: &'static str) -> Result<Vec<String>, ManifestError> {
        match self.object.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(self.malformed(key, "an array of strings")),
                })
                .collect(),
            Some(_) => Err(self.malformed(key, "an array of strings")),
        }
    }

    /// A string, or an array of lines each kept as a soft line break.
    fn description(&self) -> Result<String, ManifestError> {
        const EXPECTED: &str = "a string or an array of strings";
        match self.object.get(keys::DESCRIPTION) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Array(lines)) => {
                let mut description = String::new();
                for line in lines {
                    let Value::String(line) = line else {
                        return Err(self.malformed(keys::DESCRIPTION, EXPECTED));
                    };
                    description.push_str(line);
                    description.push_str("  \n");
                }
                Ok(description)
            }
            Some(_) => Err(self.malformed(keys::DESCRIPTION, EXPECTED)),
        }
    }
}

/// Parse a manifest document, failing on the first problem.
///
/// Manifests only describe the core paragraph: the result never has feature
/// paragraphs, and dependencies carry no features or qualifiers.
pub fn parse_manifest(path: &Path, document: &Value) -> Result<SourceControlFile, ManifestError> {
    let path = path.display().to_string();

    let Value::Object(object) = document else {
        return Err(ManifestError::NotAnObject { path });
    };

    if let Some(key) = object
        .keys()
        .find(|k| !is_directive(k) && !MANIFEST_FIELDS.contains(&k.as_str()))
    {
        return Err(ManifestError::UnknownKey {
            path,
            key: key.clone(),
        });
    }

    let reader = ManifestReader { path, object };

    let name = reader.required_string(keys::NAME)?;
    let version = reader.required_string(keys::VERSION)?;
    let description = reader.description()?;
    let maintainers = reader.string_array(keys::MAINTAINERS)?;
    let homepage = reader.optional_string(keys::HOMEPAGE)?;
    let depends = reader
        .string_array(keys::DEPENDENCIES)?
        .into_iter()
        .map(Dependency::new)
        .collect();

    tracing::debug!("{}: parsed manifest for `{}`", reader.path, name);

    let core_paragraph = SourceParagraph {
        id: PackageIdentity::new(name, version),
        description,
        maintainers,
        homepage,
        depends,
        ..Default::default()
    };

    Ok(SourceControlFile::new(core_paragraph, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paragraph::PortKind;
    use serde_json::json;

    fn parse(document: Value) -> Result<SourceControlFile, ManifestError> {
        parse_manifest(Path::new("ports/test/vcpkg.json"), &document)
    }

    #[test]
    fn test_parse_basic_manifest() {
        let scf = parse(json!({
            "$schema": "https://example.com/vcpkg.schema.json",
            "name": "fmt",
            "version": "6.1.2",
            "description": "Formatting library",
            "maintainers": ["Alice <a@example.com>"],
            "homepage": "https://fmt.dev",
            "dependencies": ["zlib", "openssl"],
            "supports": "!uwp"
        }))
        .unwrap();

        let core = &scf.core_paragraph;
        assert_eq!(core.name(), "fmt");
        assert_eq!(core.version(), "6.1.2");
        assert_eq!(core.description, "Formatting library");
        assert_eq!(core.maintainers, vec!["Alice <a@example.com>".to_string()]);
        assert_eq!(core.homepage.as_deref(), Some("https://fmt.dev"));
        assert_eq!(core.depends.len(), 2);
        assert!(core.depends.iter().all(|d| d.features().is_empty() && d.is_unconditional()));
        assert!(scf.feature_paragraphs.is_empty());
        assert!(core.supports_expression.is_none());
        assert!(core.default_features.is_empty());
        assert_eq!(core.kind, PortKind::Port);
    }

    #[test]
    fn test_description_array() {
        let scf = parse(json!({
            "name": "fmt",
            "version": "1",
            "description": ["line1", "line2"]
        }))
        .unwrap();
        assert_eq!(scf.core_paragraph.description, "line1  \nline2  \n");
    }

    #[test]
    fn test_unknown_key_is_fatal() {
        let err = parse(json!({ "name": "fmt", "version": "1", "features": {} })).unwrap_err();
        assert_eq!(
            err,
            ManifestError::UnknownKey {
                path: "ports/test/vcpkg.json".to_string(),
                key: "features".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_name_or_version() {
        assert!(matches!(
            parse(json!({ "version": "1" })),
            Err(ManifestError::MissingField { key: "name", .. })
        ));
        assert!(matches!(
            parse(json!({ "name": "fmt" })),
            Err(ManifestError::MissingField { key: "version", .. })
        ));
    }

    #[test]
    fn test_wrong_types() {
        let cases = [
            (json!({ "name": 1, "version": "1" }), "name"),
            (json!({ "name": "a", "version": 1.5 }), "version"),
            (json!({ "name": "a", "version": "1", "description": ["ok", 2] }), "description"),
            (json!({ "name": "a", "version": "1", "description": true }), "description"),
            (json!({ "name": "a", "version": "1", "maintainers": "Alice" }), "maintainers"),
            (json!({ "name": "a", "version": "1", "maintainers": [null] }), "maintainers"),
            (json!({ "name": "a", "version": "1", "homepage": ["x"] }), "homepage"),
            (json!({ "name": "a", "version": "1", "dependencies": "zlib" }), "dependencies"),
            (
                json!({ "name": "a", "version": "1", "dependencies": [{ "name": "zlib" }] }),
                "dependencies",
            ),
        ];

        for (document, field) in cases {
            match parse(document) {
                Err(ManifestError::MalformedField { key, .. }) => assert_eq!(key, field),
                other => panic!("expected malformed `{}`, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            parse(json!(["name", "fmt"])),
            Err(ManifestError::NotAnObject { .. })
        ));
    }
}
