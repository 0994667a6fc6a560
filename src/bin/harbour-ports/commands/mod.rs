//! Command implementations

pub mod check;
pub mod completions;
pub mod depends;
pub mod list;
