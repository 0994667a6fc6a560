//! High-level operations.

pub mod filter;

pub use filter::filter_dependencies;
