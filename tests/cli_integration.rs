//! CLI integration tests for harbour-ports.
//!
//! These tests write small ports trees to a temp directory and drive the
//! binary against them.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the harbour-ports binary command, isolated from user config.
fn harbour_ports(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("harbour-ports").unwrap();
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("VCPKG_DEFAULT_TRIPLET")
        .current_dir(home);
    cmd
}

/// Create a temporary directory for test ports.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_port(root: &Path, name: &str, file: &str, content: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

const CURL_CONTROL: &str = "\
Source: curl
Version: 7.68.0
Description: A library for transferring data with URLs
Build-Depends: zlib, winssl (windows), openssl (!windows)
Default-Features: ssl

Feature: ssl
Description: SSL support
Build-Depends: openssl[tools] (!windows)

Feature: http2
Description: HTTP/2 support
Build-Depends: nghttp2
";

// ============================================================================
// harbour-ports check
// ============================================================================

#[test]
fn test_check_valid_control_port() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .args(["check", "curl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("curl 7.68.0: ok (2 feature(s))"));
}

#[test]
fn test_check_valid_manifest_port() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "fmt",
        "vcpkg.json",
        r#"{ "name": "fmt", "version": "6.1.2", "description": ["Formatting", "library"] }"#,
    );

    harbour_ports(tmp.path())
        .args(["check", "fmt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmt 6.1.2: ok (0 feature(s))"));
}

#[test]
fn test_check_reports_all_paragraph_problems() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "broken",
        "CONTROL",
        "Source: broken\nColour: blue\n\nFeature: ssl\n",
    );

    harbour_ports(tmp.path())
        .args(["check", "broken", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid fields in the control file of `broken`"))
        .stderr(predicate::str::contains("unexpected field: Colour"))
        .stderr(predicate::str::contains("missing field: Version"))
        .stderr(predicate::str::contains("missing fields in the control file of `ssl`"))
        .stderr(predicate::str::contains("missing field: Description"));
}

#[test]
fn test_check_lists_feature_fields_for_feature_paragraphs() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "odd",
        "CONTROL",
        "Source: odd\nVersion: 1\n\nFeature: x\nDescription: x\nSupports: windows\n",
    );

    harbour_ports(tmp.path())
        .args(["check", "odd", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid fields in the control file of `x`"))
        .stderr(predicate::str::contains("unexpected field: Supports"))
        .stderr(predicate::str::contains(
            "valid fields (case-sensitive): Feature, Description, Build-Depends\n",
        ));
}

#[test]
fn test_check_warns_when_both_descriptors_exist() {
    let tmp = temp_dir();
    write_port(tmp.path(), "fmt", "CONTROL", "Source: fmt\nVersion: 5\n");
    write_port(tmp.path(), "fmt", "vcpkg.json", r#"{ "name": "fmt", "version": "6.1.2" }"#);

    harbour_ports(tmp.path())
        .args(["check", "fmt", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmt 6.1.2: ok"))
        .stderr(predicate::str::contains("warning: both vcpkg.json and CONTROL are present"));
}

#[test]
fn test_check_malformed_dependencies() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "bad",
        "CONTROL",
        "Source: bad\nVersion: 1\nBuild-Depends: zlib,\n",
    );

    harbour_ports(tmp.path())
        .args(["check", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected package name"));
}

#[test]
fn test_check_unknown_manifest_key() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "fmt",
        "vcpkg.json",
        r#"{ "name": "fmt", "version": "1", "license": "MIT" }"#,
    );

    harbour_ports(tmp.path())
        .args(["check", "fmt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field `license`"));
}

// ============================================================================
// harbour-ports depends
// ============================================================================

#[test]
fn test_depends_on_windows() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .args(["depends", "curl", "--triplet", "x64-windows"])
        .assert()
        .success()
        .stdout("zlib:x64-windows\nwinssl:x64-windows\n");
}

#[test]
fn test_depends_on_linux() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .args(["depends", "curl", "--triplet", "x64-linux"])
        .assert()
        .success()
        .stdout("zlib:x64-linux\nopenssl:x64-linux\n");
}

#[test]
fn test_depends_for_feature() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .args(["depends", "curl", "--feature", "ssl", "--triplet", "x64-linux"])
        .assert()
        .success()
        .stdout("openssl[tools]:x64-linux\n");

    harbour_ports(tmp.path())
        .args(["depends", "curl", "--feature", "brotli", "--triplet", "x64-linux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no feature `brotli`"));
}

#[test]
fn test_depends_uses_variables() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    // With build variables, `windows` follows the CMake system name.
    harbour_ports(tmp.path())
        .args([
            "depends",
            "curl",
            "--triplet",
            "x64-windows",
            "--var",
            "VCPKG_CMAKE_SYSTEM_NAME=Linux",
        ])
        .assert()
        .success()
        .stdout("zlib:x64-windows\nopenssl:x64-windows\n");
}

#[test]
fn test_depends_triplet_from_project_config() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);
    fs::create_dir_all(tmp.path().join(".harbour")).unwrap();
    fs::write(
        tmp.path().join(".harbour/ports.toml"),
        "[filter]\ntriplet = \"arm64-windows\"\n",
    )
    .unwrap();

    harbour_ports(tmp.path())
        .args(["depends", "curl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("winssl:arm64-windows"));
}

#[test]
fn test_depends_triplet_from_env() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .env("VCPKG_DEFAULT_TRIPLET", "x86-windows")
        .args(["depends", "curl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("winssl:x86-windows"));
}

#[test]
fn test_depends_malformed_qualifier() {
    let tmp = temp_dir();
    write_port(
        tmp.path(),
        "odd",
        "CONTROL",
        "Source: odd\nVersion: 1\nBuild-Depends: zlib (windows & | linux)\n",
    );

    harbour_ports(tmp.path())
        .args(["depends", "odd", "--triplet", "x64-linux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid qualifier"));
}

#[test]
fn test_depends_rejects_bad_var() {
    let tmp = temp_dir();
    write_port(tmp.path(), "curl", "CONTROL", CURL_CONTROL);

    harbour_ports(tmp.path())
        .args(["depends", "curl", "--var", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

// ============================================================================
// harbour-ports list
// ============================================================================

#[test]
fn test_list_reports_ports_and_failures() {
    let tmp = temp_dir();
    let ports = tmp.path().join("ports");
    write_port(&ports, "curl", "CONTROL", CURL_CONTROL);
    write_port(&ports, "fmt", "vcpkg.json", r#"{ "name": "fmt", "version": "6.1.2" }"#);
    write_port(&ports, "broken", "CONTROL", "Source: broken\n");

    harbour_ports(tmp.path())
        .args(["list", "ports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("curl"))
        .stdout(predicate::str::contains("6.1.2"))
        .stdout(predicate::str::contains("broken").not())
        .stderr(predicate::str::contains("1 port(s) failed to load"));
}

#[test]
fn test_list_missing_directory() {
    let tmp = temp_dir();

    harbour_ports(tmp.path())
        .args(["list", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ports directory not found"));
}

// ============================================================================
// harbour-ports completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    harbour_ports(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("harbour-ports"));
}
