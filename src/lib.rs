//! Harbour ports - port metadata front-end for Harbour
//!
//! This crate reads vcpkg-style port descriptors (CONTROL files and
//! vcpkg.json manifests) into one canonical model, validates them, and
//! filters declared dependencies for a target triplet.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

pub use core::{
    dependency::Dependency, paragraph::SourceParagraph, registry::PortRegistry,
    source_control_file::SourceControlFile, triplet::Triplet,
};

pub use ops::filter_dependencies;
pub use sources::load_port;
