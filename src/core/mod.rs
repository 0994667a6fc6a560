//! Core data structures for Harbour ports.
//!
//! This module contains the canonical port metadata model and the code that
//! builds it:
//! - Identities, triplets, and dependency edges
//! - Core and feature paragraphs, owned by a SourceControlFile
//! - CONTROL and vcpkg.json ingestion
//! - Qualifier expressions
//! - The port registry

pub mod control;
pub mod dependency;
pub mod expression;
pub mod manifest;
pub mod package_id;
pub mod paragraph;
pub mod registry;
pub mod source_control_file;
pub mod triplet;

pub use control::{parse_control_paragraphs, ControlFileError};
pub use dependency::{parse_dependencies, parse_feature_names, Dependency, DependencyParseError};
pub use expression::{evaluate, EvaluationContext, ExpressionError};
pub use manifest::{parse_manifest, ManifestError};
pub use package_id::PackageIdentity;
pub use paragraph::{FeatureParagraph, PortKind, SourceParagraph};
pub use registry::{LoadFailure, PortRegistry};
pub use source_control_file::{ModelError, SourceControlFile, CORE_FEATURE};
pub use triplet::{ConcreteTargetSpec, Triplet};
