//! The canonical metadata of one port.
//!
//! A SourceControlFile is built once per descriptor load, from either a
//! CONTROL file or a vcpkg.json manifest, and is treated as immutable after
//! that. It owns its core paragraph and every feature paragraph.

use std::collections::HashSet;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::dependency::Dependency;
use crate::core::paragraph::{FeatureParagraph, SourceParagraph};

/// Reserved feature name that always refers to the core paragraph.
pub const CORE_FEATURE: &str = "core";

/// Structural problems with an assembled model.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ModelError {
    #[error("feature `{feature}` is declared more than once in `{package}`")]
    #[diagnostic(code(harbour::ports::duplicate_feature))]
    DuplicateFeatureName { package: String, feature: String },

    #[error("`{package}` declares a feature named `core`, which is reserved")]
    #[diagnostic(
        code(harbour::ports::reserved_feature),
        help("`core` always refers to the port's base paragraph; rename the feature")
    )]
    ReservedFeatureName { package: String },
}

impl ModelError {
    /// Name of the offending feature.
    pub fn feature(&self) -> &str {
        match self {
            ModelError::DuplicateFeatureName { feature, .. } => feature,
            ModelError::ReservedFeatureName { .. } => CORE_FEATURE,
        }
    }
}

/// A port: exactly one core paragraph plus its features, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceControlFile {
    pub core_paragraph: SourceParagraph,
    pub feature_paragraphs: Vec<FeatureParagraph>,
}

impl SourceControlFile {
    pub fn new(core_paragraph: SourceParagraph, feature_paragraphs: Vec<FeatureParagraph>) -> Self {
        SourceControlFile {
            core_paragraph,
            feature_paragraphs,
        }
    }

    /// Get the port name.
    pub fn name(&self) -> &str {
        self.core_paragraph.name()
    }

    /// Find a feature by exact name; the first declaration wins.
    pub fn find_feature(&self, name: &str) -> Option<&FeatureParagraph> {
        self.feature_paragraphs.iter().find(|f| f.name == name)
    }

    /// Dependencies of a feature, where `core` means the core paragraph.
    pub fn find_dependencies_for_feature(&self, name: &str) -> Option<&[Dependency]> {
        if name == CORE_FEATURE {
            return Some(&self.core_paragraph.depends);
        }
        self.find_feature(name).map(|f| f.depends.as_slice())
    }

    /// Check feature-name invariants, reporting every violation in order.
    pub fn validate(&self) -> Vec<ModelError> {
        let package = self.name().to_string();
        let mut seen = HashSet::new();
        let mut problems = Vec::new();

        for feature in &self.feature_paragraphs {
            if feature.name == CORE_FEATURE {
                problems.push(ModelError::ReservedFeatureName {
                    package: package.clone(),
                });
            } else if !seen.insert(feature.name.as_str()) {
                problems.push(ModelError::DuplicateFeatureName {
                    package: package.clone(),
                    feature: feature.name.clone(),
                });
            }
        }

        problems
    }
}
