//! Target triplets and the concrete specs produced for them.
//!
//! A Triplet names one target build environment (e.g. `x64-windows`).
//! Triplets are interned: cloning is free and equality is a pointer compare.

use std::collections::{BTreeSet, HashSet};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

/// Global triplet interner
static TRIPLET_INTERNER: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// A target build environment, exposed to qualifiers by its canonical name.
#[derive(Clone, Copy)]
pub struct Triplet {
    name: &'static str,
}

impl Triplet {
    /// Intern a triplet from its name. Names are canonicalized to lowercase.
    pub fn from_canonical_name(name: impl AsRef<str>) -> Self {
        let canonical = name.as_ref().trim().to_ascii_lowercase();

        {
            let interner = TRIPLET_INTERNER.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&interned) = interner.get(canonical.as_str()) {
                return Triplet { name: interned };
            }
        }

        let mut interner = TRIPLET_INTERNER.write().unwrap_or_else(|e| e.into_inner());

        // Double-check after acquiring write lock
        if let Some(&interned) = interner.get(canonical.as_str()) {
            return Triplet { name: interned };
        }

        let leaked: &'static str = Box::leak(canonical.into_boxed_str());
        interner.insert(leaked);

        Triplet { name: leaked }
    }

    /// The canonical name, as seen by qualifier expressions.
    #[inline]
    pub fn canonical_name(&self) -> &'static str {
        self.name
    }

    /// Best-effort triplet for the machine we are running on.
    ///
    /// Falls back to `x64-linux` on hosts with no vcpkg community triplet.
    pub fn host() -> Self {
        let arch = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "x86" => "x86",
            "aarch64" => "arm64",
            "arm" => "arm",
            _ => "x64",
        };

        let os = match std::env::consts::OS {
            "windows" => "windows",
            "macos" => "osx",
            _ => "linux",
        };

        Triplet::from_canonical_name(format!("{}-{}", arch, os))
    }
}

impl PartialEq for Triplet {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.name, other.name)
    }
}

impl Eq for Triplet {}

impl Hash for Triplet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.name, state)
    }
}

impl PartialOrd for Triplet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Triplet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(other.name)
    }
}

impl fmt::Debug for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triplet({:?})", self.name)
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Triplet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Triplet::from_canonical_name(s))
    }
}

/// A dependency pinned to one triplet with a concrete feature set.
///
/// Produced by the dependency filter; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcreteTargetSpec {
    name: String,
    triplet: Triplet,
    features: BTreeSet<String>,
}

impl ConcreteTargetSpec {
    pub fn new(name: impl Into<String>, triplet: Triplet, features: BTreeSet<String>) -> Self {
        ConcreteTargetSpec {
            name: name.into(),
            triplet,
            features,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triplet(&self) -> Triplet {
        self.triplet
    }

    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }
}

impl fmt::Display for ConcreteTargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.features.is_empty() {
            let features: Vec<&str> = self.features.iter().map(String::as_str).collect();
            write!(f, "[{}]", features.join(","))?;
        }
        write!(f, ":{}", self.triplet)
    }
}
