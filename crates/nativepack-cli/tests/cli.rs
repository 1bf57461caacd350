// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Integration tests for the nativepack CLI
//!
//! These tests run the `nativepack` binary end-to-end using the assert_cmd
//! crate pattern. The demo round trip needs the `hello-native` cdylib to be
//! built (`cargo build -p hello-native`) and is skipped otherwise.

use assert_cmd::Command;
use predicates::prelude::*;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Helper to create a Command for the nativepack binary
/// Uses NATIVEPACK_BIN environment variable if set, otherwise the cargo-built binary
fn nativepack_cmd() -> Command {
    let mut cmd = match env::var("NATIVEPACK_BIN") {
        Ok(bin_path) => Command::new(bin_path),
        Err(_) => Command::new(env!("CARGO_BIN_EXE_nativepack")),
    };

    // Isolate from the caller's configuration
    cmd.env_remove("NATIVEPACK_RESOURCES")
        .env_remove("NATIVEPACK_OS")
        .env_remove("NATIVEPACK_ARCH");
    cmd
}

/// Physical file name of `name` on the host, as the resolve command reports it
fn host_file_name(name: &str) -> Option<String> {
    let output = nativepack_cmd()
        .args(["resolve", name, "--json"])
        .output()
        .unwrap();
    if !output.status.success() {
        return None;
    }
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["file_name"].as_str().map(str::to_string)
}

/// Locate the built hello-native library in the cargo target directory
fn hello_native_library() -> Option<PathBuf> {
    let target_dir = env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join("target")
        });

    let file_name = if cfg!(target_os = "windows") {
        "hello_native.dll"
    } else if cfg!(target_os = "macos") {
        "libhello_native.dylib"
    } else {
        "libhello_native.so"
    };

    ["debug", "release"]
        .iter()
        .map(|profile| target_dir.join(profile).join(file_name))
        .find(|path| path.is_file())
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    nativepack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("nativepack CLI"))
        .stdout(predicate::str::contains("platform"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn test_cli_version() {
    nativepack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nativepack"));
}

#[test]
fn test_invalid_subcommand() {
    nativepack_cmd().arg("unload").assert().failure();
}

// =============================================================================
// Platform
// =============================================================================

#[test]
fn test_platform_json() {
    let output = nativepack_cmd()
        .args(["platform", "--json", "--os", "Darwin", "--arch", "arm64"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["os_name"], "darwin");
    assert_eq!(json["os_segment"], "macos");
    assert_eq!(json["arch_segment"], "aarch64");
    assert_eq!(json["supported"], true);
}

#[test]
fn test_platform_env_override() {
    nativepack_cmd()
        .arg("platform")
        .env("NATIVEPACK_OS", "plan9")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan9"))
        .stdout(predicate::str::contains("Supported:    no"));
}

// =============================================================================
// Resolve
// =============================================================================

#[test]
fn test_resolve_table() {
    let cases = [
        ("windows 10", "amd64", "/windows/x86-64/HelloNative.dll"),
        ("windows 7", "x86", "/windows/x86/HelloNative.dll"),
        ("mac os x", "x86_64", "/macos/x86-64/libHelloNative.dylib"),
        ("darwin", "aarch64", "/macos/aarch64/libHelloNative.dylib"),
        ("linux", "x86_64", "/linux/x86-64/libHelloNative.so"),
        ("linux", "arm64", "/linux/aarch64/libHelloNative.so"),
    ];

    for (os, arch, path) in cases {
        nativepack_cmd()
            .args(["resolve", "HelloNative", "--os", os, "--arch", arch])
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("{}\n", path)));
    }
}

#[test]
fn test_resolve_json() {
    let output = nativepack_cmd()
        .args(["--json", "resolve", "JniDemo", "--os", "linux", "--arch", "amd64"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "JniDemo");
    assert_eq!(json["file_name"], "libJniDemo.so");
    assert_eq!(json["resource_path"], "/linux/x86-64/libJniDemo.so");
}

#[test]
fn test_resolve_unsupported_platform() {
    nativepack_cmd()
        .args(["resolve", "HelloNative", "--os", "plan9"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unsupported platform"));
}

// =============================================================================
// Package
// =============================================================================

#[test]
fn test_package() {
    let work = tempfile::tempdir().unwrap();
    let library = work.path().join("libhello_native.so");
    fs::write(&library, b"library bytes").unwrap();
    let resources = work.path().join("resources");

    let args = [
        "package",
        library.to_str().unwrap(),
        "--name",
        "Demo",
        "--resources",
        resources.to_str().unwrap(),
        "--os",
        "linux",
        "--arch",
        "x86_64",
    ];

    nativepack_cmd().args(args).assert().success();
    let packaged = resources.join("linux").join("x86-64").join("libDemo.so");
    assert_eq!(fs::read(&packaged).unwrap(), b"library bytes");

    // Refuses to overwrite without --force
    nativepack_cmd()
        .args(args)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    fs::write(&library, b"rebuilt").unwrap();
    nativepack_cmd().args(args).arg("--force").assert().success();
    assert_eq!(fs::read(&packaged).unwrap(), b"rebuilt");
}

#[test]
fn test_package_from_env() {
    let work = tempfile::tempdir().unwrap();
    let library = work.path().join("hello_native.dll");
    fs::write(&library, b"MZ").unwrap();

    let output = nativepack_cmd()
        .args(["package", library.to_str().unwrap(), "--name", "Demo", "--json"])
        .args(["--os", "windows 11", "--arch", "amd64"])
        .env("NATIVEPACK_RESOURCES", work.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resource_path"], "/windows/x86-64/Demo.dll");
    assert_eq!(json["bytes"], 2);
    assert!(work.path().join("windows/x86-64/Demo.dll").is_file());
}

#[test]
fn test_package_missing_library() {
    let work = tempfile::tempdir().unwrap();
    nativepack_cmd()
        .args(["package", "does-not-exist.so", "--name", "Demo", "--resources"])
        .arg(work.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does-not-exist.so"));
}

// =============================================================================
// Demo
// =============================================================================

#[test]
fn test_demo_missing_resource() {
    if host_file_name("HelloNative").is_none() {
        println!("Unsupported host platform, skipping");
        return;
    }

    let resources = tempfile::tempdir().unwrap();
    nativepack_cmd()
        .args(["demo", "--resources"])
        .arg(resources.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("'HelloNative'"));
}

#[test]
fn test_demo_unsupported_platform() {
    let resources = tempfile::tempdir().unwrap();
    nativepack_cmd()
        .args(["demo", "--resources"])
        .arg(resources.path())
        .env("NATIVEPACK_OS", "plan9")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("<unresolved>"));
}

#[test]
fn test_demo_corrupt_library() {
    let Some(file_name) = host_file_name("HelloNative") else {
        println!("Unsupported host platform, skipping");
        return;
    };

    let work = tempfile::tempdir().unwrap();
    let library = work.path().join(&file_name);
    fs::write(&library, b"not a shared library").unwrap();
    let resources = work.path().join("resources");

    nativepack_cmd()
        .args(["package", library.to_str().unwrap(), "--name", "HelloNative"])
        .arg("--resources")
        .arg(&resources)
        .assert()
        .success();

    nativepack_cmd()
        .args(["demo", "--resources"])
        .arg(&resources)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Link failed"));
}

#[test]
fn test_demo_round_trip() {
    let Some(library) = hello_native_library() else {
        println!("hello-native library not built, skipping");
        return;
    };

    let resources = tempfile::tempdir().unwrap();
    nativepack_cmd()
        .args(["package", library.to_str().unwrap(), "--name", "HelloNative"])
        .arg("--resources")
        .arg(resources.path())
        .assert()
        .success();

    nativepack_cmd()
        .args(["demo", "--times", "2", "--resources"])
        .arg(resources.path())
        .assert()
        .success()
        .stdout("Hello from Rust!\nHello from Rust!\n");
}
