//! Core and feature paragraphs of a port.

use std::fmt;

use serde::Serialize;

use crate::core::dependency::Dependency;
use crate::core::package_id::PackageIdentity;

/// What kind of entry a port is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// A regular buildable port
    #[default]
    Port,
    /// Redirects to another implementation
    Alias,
    /// A kind token this version does not support
    Unknown,
}

impl PortKind {
    /// Map a `Type:` field value. Never fails; unsupported tokens map to `Unknown`.
    pub fn from_field(value: &str) -> Self {
        match value {
            "Alias" => PortKind::Alias,
            "" | "Port" => PortKind::Port,
            _ => PortKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortKind::Port => "Port",
            PortKind::Alias => "Alias",
            PortKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The always-present base metadata of a port (the `core` feature).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceParagraph {
    #[serde(flatten)]
    pub id: PackageIdentity,

    /// Free text, may span several lines
    pub description: String,

    pub maintainers: Vec<String>,

    pub homepage: Option<String>,

    pub depends: Vec<Dependency>,

    /// Features enabled when a consumer asks for default features
    pub default_features: Vec<String>,

    /// Qualifier deciding whether the port builds at all
    pub supports_expression: Option<String>,

    pub kind: PortKind,
}

impl SourceParagraph {
    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn version(&self) -> &str {
        &self.id.version
    }
}

/// A named, independently selectable unit of optional functionality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureParagraph {
    pub name: String,
    pub description: String,
    pub depends: Vec<Dependency>,
}
