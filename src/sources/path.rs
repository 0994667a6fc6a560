//! Path source - ports on the local filesystem.
//!
//! A port directory holds either a `vcpkg.json` manifest or a `CONTROL`
//! file. When both exist the manifest is used.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::control::parse_control_paragraphs;
use crate::core::manifest::parse_manifest;
use crate::core::SourceControlFile;
use crate::util::paragraphs::parse_paragraphs;

/// CONTROL file name.
pub const CONTROL_FILE: &str = "CONTROL";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "vcpkg.json";

/// Load a port from a directory, a CONTROL file, or a manifest file.
pub fn load_port(path: &Path) -> Result<SourceControlFile> {
    if path.is_dir() {
        let manifest = path.join(MANIFEST_FILE);
        let control = path.join(CONTROL_FILE);

        if manifest.is_file() {
            if control.is_file() {
                tracing::debug!(
                    "{}: both {} and {} present, using the manifest",
                    path.display(),
                    MANIFEST_FILE,
                    CONTROL_FILE
                );
            }
            return load_manifest_file(&manifest);
        }

        if control.is_file() {
            return load_control_file(&control);
        }

        bail!(
            "`{}` is not a port: it contains neither {} nor {}",
            path.display(),
            MANIFEST_FILE,
            CONTROL_FILE
        );
    }

    if path.extension().is_some_and(|ext| ext == "json") {
        load_manifest_file(path)
    } else {
        load_control_file(path)
    }
}

/// Load and ingest a CONTROL file.
pub fn load_control_file(path: &Path) -> Result<SourceControlFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read control file: {}", path.display()))?;

    let paragraphs = parse_paragraphs(&text, &path.display().to_string())?;
    let scf = parse_control_paragraphs(path, paragraphs)?;

    Ok(scf)
}

/// Load and ingest a vcpkg.json manifest.
pub fn load_manifest_file(path: &Path) -> Result<SourceControlFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;

    let document: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    let scf = parse_manifest(path, &document)?;

    Ok(scf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::control::ControlFileError;
    use crate::core::manifest::ManifestError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_control_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONTROL_FILE),
            "Source: zlib\nVersion: 1.2.11\nDescription: compression\n",
        )
        .unwrap();

        let scf = load_port(tmp.path()).unwrap();
        assert_eq!(scf.name(), "zlib");
    }

    #[test]
    fn test_manifest_preferred_over_control() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONTROL_FILE), "Source: old\nVersion: 1\n").unwrap();
        fs::write(
            tmp.path().join(MANIFEST_FILE),
            r#"{ "name": "new", "version": "2" }"#,
        )
        .unwrap();

        let scf = load_port(tmp.path()).unwrap();
        assert_eq!(scf.name(), "new");
    }

    #[test]
    fn test_load_file_paths() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join("fmt.json");
        fs::write(&manifest, r#"{ "name": "fmt", "version": "6" }"#).unwrap();
        assert_eq!(load_port(&manifest).unwrap().name(), "fmt");

        let control = tmp.path().join("CONTROL");
        fs::write(&control, "Source: fmt\nVersion: 6\n").unwrap();
        assert_eq!(load_port(&control).unwrap().name(), "fmt");
    }

    #[test]
    fn test_not_a_port() {
        let tmp = TempDir::new().unwrap();
        let err = load_port(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("is not a port"));
    }

    #[test]
    fn test_errors_keep_their_type() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONTROL_FILE), "Source: zlib\n").unwrap();
        let err = load_port(tmp.path()).unwrap_err();
        let control = err.downcast_ref::<ControlFileError>().unwrap();
        assert_eq!(control.diagnostics().len(), 1);

        let manifest = tmp.path().join("bad.json");
        fs::write(&manifest, r#"{ "name": "zlib", "version": "1", "extra": 1 }"#).unwrap();
        let err = load_port(&manifest).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let err = load_port(tmp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }
}
