// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use clap::Args as ClapArgs;
use nativepack::{Platform, ResolvedLibrary};
use serde::Serialize;

/// Target platform selection shared by several subcommands
#[derive(ClapArgs, Debug, Default)]
pub struct TargetArgs {
    /// Operating system name (e.g. "linux", "darwin", "windows 10"), defaults to the host
    #[arg(long)]
    pub os: Option<String>,

    /// CPU architecture name (e.g. "x86_64", "amd64", "aarch64"), defaults to the host
    #[arg(long)]
    pub arch: Option<String>,
}

impl TargetArgs {
    /// Platform described by the flags, falling back to the host for any
    /// value not given
    pub fn platform(&self) -> Platform {
        let host = Platform::current();
        if self.os.is_none() && self.arch.is_none() {
            return host.clone();
        }

        Platform::from_names(
            self.os.as_deref().unwrap_or(host.os_name()),
            self.arch.as_deref().unwrap_or(host.arch_name()),
        )
    }
}

/// Resolve `name` for `platform`, failing with an exit-code mapped error
pub fn resolve(platform: &Platform, name: &str) -> Result<ResolvedLibrary, CliError> {
    if name.is_empty() {
        return Err(CliError::InvalidArgs(
            "library name must not be empty".to_string(),
        ));
    }

    platform.resolve(name).ok_or_else(|| {
        CliError::UnsupportedPlatform(format!(
            "no library mapping for {} (supported: windows, macos, linux on x86, x86-64, aarch64)",
            platform
        ))
    })
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json_str);
    Ok(())
}
