//! Package identification - WHICH port (name + version).
//!
//! Port versions are free-form strings (`1.2.11`, `2020-03-01`, `3.0-2`), so
//! unlike resolver package ids these are not parsed as semver.

use std::fmt;

use serde::Serialize;

/// Name and version of a port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageIdentity {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Get a display string like "zlib 1.2.11"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
