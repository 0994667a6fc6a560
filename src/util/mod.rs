//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod paragraphs;

pub use config::Config;
pub use diagnostic::{Diagnostic, ParseDiagnostic};
pub use paragraphs::{parse_paragraphs, FieldValue, Paragraph, TextRowCol};
