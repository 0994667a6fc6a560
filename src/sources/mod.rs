//! Port sources.
//!
//! Sources are responsible for reading port descriptors from disk and
//! handing them to the matching ingestor.

pub mod path;

pub use path::{load_control_file, load_manifest_file, load_port, CONTROL_FILE, MANIFEST_FILE};
